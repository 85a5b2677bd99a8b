use crate::evaluation::{BasicEstimator, PerformanceEvaluator, RegressionEvaluator, WindowEstimator};
use crate::regressors::Regressor;
use crate::regressors::fimtdd::FimtDd;
use crate::streams::Stream;
use crate::streams::arff::ArffFileStream;
use crate::streams::generators::DriftingLinearGenerator;
use crate::tasks::PrequentialEvaluator;
use crate::ui::types::choices::{EvaluatorChoice, LearnerChoice, PrequentialParams, StreamChoice};
use anyhow::{Context, Result};

pub fn build_learner(choice: LearnerChoice) -> Result<Box<dyn Regressor>> {
    match choice {
        LearnerChoice::Fimtdd(params) => {
            let tree = FimtDd::try_new(params).context("invalid FIMT-DD parameters")?;
            Ok(Box::new(tree))
        }
    }
}

pub fn build_stream(choice: StreamChoice) -> Result<Box<dyn Stream>> {
    match choice {
        StreamChoice::ArffFile(p) => {
            let stream = ArffFileStream::open(&p.path, p.target_index)
                .with_context(|| format!("cannot open ARFF stream {}", p.path.display()))?;
            Ok(Box::new(stream))
        }
        StreamChoice::DriftingLinear(p) => Ok(Box::new(DriftingLinearGenerator::new(
            p.weights,
            p.intercept,
            p.noise,
            p.drift_magnitude,
            p.drift_every,
            p.seed,
            p.max_instances,
        ))),
    }
}

pub fn build_evaluator(choice: EvaluatorChoice) -> Box<dyn PerformanceEvaluator> {
    match choice {
        EvaluatorChoice::BasicRegression(_) => {
            Box::new(RegressionEvaluator::new(BasicEstimator::default()))
        }
        EvaluatorChoice::WindowRegression(p) => {
            Box::new(RegressionEvaluator::new(WindowEstimator::new(p.window_size)))
        }
    }
}

pub fn build_prequential(params: PrequentialParams) -> Result<PrequentialEvaluator> {
    let learner = build_learner(params.learner).context("failed to build learner")?;
    let stream = build_stream(params.stream).context("failed to build stream")?;
    let evaluator = build_evaluator(params.evaluator);
    PrequentialEvaluator::new(
        learner,
        stream,
        evaluator,
        params.max_instances,
        params.max_seconds,
        params.sample_frequency,
        params.mem_check_frequency,
    )
    .context("failed to construct prequential evaluator")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressors::fimtdd::FimtDdParameters;
    use crate::ui::types::choices::{
        ArffParameters, DriftingLinearParameters, DumpFormat, NoParams,
    };

    #[test]
    fn invalid_learner_parameters_are_reported() {
        let params = FimtDdParameters {
            split_confidence: 0.0,
            ..FimtDdParameters::default()
        };
        let err = build_learner(LearnerChoice::Fimtdd(params)).err().unwrap();
        assert!(format!("{err:#}").contains("split_confidence"));
    }

    #[test]
    fn missing_arff_file_is_an_error() {
        let choice = StreamChoice::ArffFile(ArffParameters {
            path: "does/not/exist.arff".into(),
            target_index: None,
        });
        assert!(build_stream(choice).is_err());
    }

    #[test]
    fn prequential_run_over_generator() {
        let params = PrequentialParams {
            learner: LearnerChoice::Fimtdd(FimtDdParameters::default()),
            stream: StreamChoice::DriftingLinear(DriftingLinearParameters {
                max_instances: Some(300),
                ..DriftingLinearParameters::default()
            }),
            evaluator: EvaluatorChoice::BasicRegression(NoParams::default()),
            max_instances: None,
            max_seconds: None,
            sample_frequency: 100,
            mem_check_frequency: 100,
            dump_file: None,
            dump_format: DumpFormat::Csv,
        };
        let mut runner = build_prequential(params).unwrap();
        runner.run().unwrap();
        assert_eq!(runner.curve().latest().unwrap().instances_seen, 300);
    }
}
