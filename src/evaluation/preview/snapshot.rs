use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Evaluation state at one point of a prequential run.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub mae: f64,
    pub rmse: f64,
    pub ram_hours: f64,
    pub seconds: f64,
    pub extras: BTreeMap<String, f64>,
}

impl Snapshot {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "seen={}, mae={}, rmse={}, ram_h={:e}, t={:.6}s",
            self.instances_seen,
            Self::fmtv(self.mae),
            Self::fmtv(self.rmse),
            self.ram_hours,
            self.seconds
        )?;

        const ORDER: &[&str] = &["mean_target", "leaves", "drifts_detected"];

        for key in ORDER {
            if let Some(v) = self.extras.get(*key) {
                write!(f, ", {}={}", key, Self::fmtv(*v))?;
            }
        }

        for (k, v) in self.extras.iter() {
            if ORDER.contains(&k.as_str()) {
                continue;
            }
            write!(f, ", {}={}", k, Self::fmtv(*v))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_known_extras_first() {
        let mut extras = BTreeMap::new();
        extras.insert("alpha".to_string(), 1.0);
        extras.insert("mean_target".to_string(), 2.5);
        let s = Snapshot {
            instances_seen: 10,
            mae: 0.5,
            rmse: f64::NAN,
            ram_hours: 0.0,
            seconds: 1.0,
            extras,
        };
        let text = s.to_string();
        assert!(text.starts_with("seen=10, mae=0.500000, rmse=NaN"));
        let mean_at = text.find("mean_target=2.500000").unwrap();
        let alpha_at = text.find("alpha=1.000000").unwrap();
        assert!(mean_at < alpha_at);
    }
}
