/// What a competition checkpoint decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompetitionOutcome {
    Undecided,
    Promote,
    Demote,
}

#[derive(Clone, Copy, Debug)]
pub struct CompetitionRules {
    pub fading_factor: f64,
    pub t_min: f64,
    pub grace_period: f64,
    pub max_lifetime: f64,
}

/// Faded squared-loss race between a subtree and its alternate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlternateCompetition {
    faded_loss_original: f64,
    faded_loss_alternate: f64,
    loss_examples_seen: f64,
    sum_qi: f64,
    num_qi: f64,
    previous_checkpoint: f64,
    sum_qi_at_checkpoint: f64,
    num_qi_at_checkpoint: f64,
}

impl AlternateCompetition {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn loss_examples_seen(&self) -> f64 {
        self.loss_examples_seen
    }

    pub fn average_qi(&self) -> f64 {
        if self.num_qi > 0.0 {
            self.sum_qi / self.num_qi
        } else {
            0.0
        }
    }

    /// Folds in the losses of one instance, `repetitions` times. The losses
    /// are computed once per instance and replayed for each repetition.
    pub fn record(
        &mut self,
        loss_original: f64,
        loss_alternate: f64,
        repetitions: u64,
        fading_factor: f64,
    ) {
        for _ in 0..repetitions {
            self.faded_loss_original = loss_original + fading_factor * self.faded_loss_original;
            self.faded_loss_alternate = loss_alternate + fading_factor * self.faded_loss_alternate;
            self.loss_examples_seen += 1.0;

            let qi = (self.faded_loss_original / self.faded_loss_alternate).ln();
            if qi.is_finite() {
                self.sum_qi += qi;
                self.num_qi += 1.0;
            }
        }
    }

    pub fn checkpoint(&mut self, rules: &CompetitionRules) -> CompetitionOutcome {
        if self.loss_examples_seen - self.previous_checkpoint < rules.t_min {
            return CompetitionOutcome::Undecided;
        }

        let lifetime = self.average_qi();
        let recent_count = self.num_qi - self.num_qi_at_checkpoint;
        let recent = if recent_count > 0.0 {
            (self.sum_qi - self.sum_qi_at_checkpoint) / recent_count
        } else {
            lifetime
        };

        self.previous_checkpoint = self.loss_examples_seen;
        self.sum_qi_at_checkpoint = self.sum_qi;
        self.num_qi_at_checkpoint = self.num_qi;

        if lifetime > 0.0 {
            CompetitionOutcome::Promote
        } else if (recent < lifetime && self.loss_examples_seen >= 10.0 * rules.grace_period)
            || self.loss_examples_seen >= rules.max_lifetime
        {
            CompetitionOutcome::Demote
        } else {
            CompetitionOutcome::Undecided
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> CompetitionRules {
        CompetitionRules {
            fading_factor: 0.995,
            t_min: 150.0,
            grace_period: 200.0,
            max_lifetime: 1500.0,
        }
    }

    fn run(comp: &mut AlternateCompetition, lo: f64, la: f64, n: usize) -> Vec<CompetitionOutcome> {
        let r = rules();
        (0..n)
            .map(|_| {
                comp.record(lo, la, 1, r.fading_factor);
                comp.checkpoint(&r)
            })
            .collect()
    }

    #[test]
    fn test_better_alternate_is_promoted_at_first_checkpoint() {
        let mut comp = AlternateCompetition::default();
        let outcomes = run(&mut comp, 4.0, 1.0, 150);
        assert!(outcomes[..149].iter().all(|o| *o == CompetitionOutcome::Undecided));
        assert_eq!(outcomes[149], CompetitionOutcome::Promote);
        assert!(comp.average_qi() > 0.0);
    }

    #[test]
    fn test_worse_alternate_is_discarded_at_max_lifetime() {
        let mut comp = AlternateCompetition::default();
        let outcomes = run(&mut comp, 1.0, 4.0, 1500);
        let first_decision = outcomes
            .iter()
            .position(|o| *o != CompetitionOutcome::Undecided);
        assert_eq!(first_decision, Some(1499));
        assert_eq!(outcomes[1499], CompetitionOutcome::Demote);
    }

    #[test]
    fn test_worsening_alternate_is_discarded_after_ten_grace_periods() {
        let mut comp = AlternateCompetition::default();
        let r = CompetitionRules {
            grace_period: 10.0,
            max_lifetime: 1e9,
            ..rules()
        };
        for _ in 0..150 {
            comp.record(1.0, 1.0, 1, r.fading_factor);
        }
        assert_eq!(comp.checkpoint(&r), CompetitionOutcome::Undecided);
        for _ in 0..150 {
            comp.record(1.0, 3.0, 1, r.fading_factor);
        }
        assert_eq!(comp.checkpoint(&r), CompetitionOutcome::Demote);
    }

    #[test]
    fn test_weighted_record_replays_the_same_losses() {
        let mut once = AlternateCompetition::default();
        once.record(2.0, 1.0, 3, 0.9);
        let mut thrice = AlternateCompetition::default();
        for _ in 0..3 {
            thrice.record(2.0, 1.0, 1, 0.9);
        }
        assert_eq!(once, thrice);
        assert_eq!(once.loss_examples_seen(), 3.0);
    }

    #[test]
    fn test_non_finite_qi_is_skipped() {
        let mut comp = AlternateCompetition::default();
        comp.record(0.0, 0.0, 5, 0.995);
        comp.record(1.0, 0.0, 5, 0.995);
        assert_eq!(comp.average_qi(), 0.0);
        assert_eq!(comp.loss_examples_seen(), 10.0);
    }
}
