use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::regressors::Regressor;
use crate::streams::Stream;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::mpsc::Sender;

use cpu_time::ThreadTime;
use tracing::{debug, info};

/// Test-then-train loop: every instance is first predicted and scored, then
/// used for training.
pub struct PrequentialEvaluator {
    learner: Box<dyn Regressor>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: LearningCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,
    mem_check_frequency: u64,

    processed: u64,

    start_cpu: ThreadTime,
    last_cpu_mem: ThreadTime,

    ram_hours: f64,
    progress_tx: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    pub fn new(
        mut learner: Box<dyn Regressor>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
        mem_check_frequency: u64,
    ) -> Result<Self, Error> {
        if sample_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "sample_frequency must be > 0",
            ));
        }
        if mem_check_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "mem_check_frequency must be > 0",
            ));
        }

        learner.set_model_context(stream.header());

        let now = ThreadTime::now();
        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            mem_check_frequency,
            processed: 0,
            start_cpu: now,
            last_cpu_mem: now,
            ram_hours: 0.0,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), Error> {
        self.start_cpu = ThreadTime::now();
        self.last_cpu_mem = self.start_cpu;
        let header = self.stream.header();
        info!(
            relation = header.relation_name(),
            max_instances = ?self.max_instances,
            max_seconds = ?self.max_seconds,
            "starting prequential evaluation"
        );

        while self.stream.has_more_instances() {
            if self.max_instances.is_some_and(|n| self.processed >= n) {
                break;
            }
            if self
                .max_seconds
                .is_some_and(|s| self.start_cpu.elapsed().as_secs() >= s)
            {
                break;
            }

            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let prediction = self.learner.predict(instance.as_ref());
            self.evaluator.add_result(instance.as_ref(), prediction);
            self.learner.train_on_instance(instance.as_ref());

            if self.processed % self.mem_check_frequency == 0 {
                self.bump_ram_hours_cpu();
            }
            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot_cpu();
            }
        }

        self.bump_ram_hours_cpu();
        self.push_snapshot_cpu();
        info!(instances = self.processed, "prequential evaluation finished");
        Ok(())
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    pub fn learner(&self) -> &dyn Regressor {
        self.learner.as_ref()
    }

    fn push_snapshot_cpu(&mut self) {
        let secs = self.start_cpu.elapsed().as_secs_f64();

        let mut mae = f64::NAN;
        let mut rmse = f64::NAN;
        let mut extras = BTreeMap::new();

        let measurements = self
            .evaluator
            .performance()
            .into_iter()
            .chain(self.learner.model_measurements());
        for m in measurements {
            match m.name.as_str() {
                "mae" => mae = m.value,
                "rmse" => rmse = m.value,
                other => {
                    extras.insert(other.to_string(), m.value);
                }
            }
        }

        let snapshot = Snapshot {
            instances_seen: self.processed,
            mae,
            rmse,
            ram_hours: self.ram_hours,
            seconds: secs,
            extras,
        };
        debug!(%snapshot, "learning curve sample");

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot.clone());
        }

        self.curve.push(snapshot);
    }

    fn bump_ram_hours_cpu(&mut self) {
        let dt = self.last_cpu_mem.elapsed();
        self.last_cpu_mem = ThreadTime::now();

        let dt_h = dt.as_secs_f64() / 3600.0;

        let model_gb = (self.learner.calc_memory_size() as f64) / (1024.0 * 1024.0 * 1024.0);
        self.ram_hours += model_gb * dt_h;
    }
}
