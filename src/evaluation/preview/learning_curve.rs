use crate::evaluation::Snapshot;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

/// Snapshots of a run, in the order they were taken.
#[derive(Clone, Debug, Default)]
pub struct LearningCurve {
    snapshots: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn export(&self, path: &Path, format: CurveFormat) -> Result<(), Error> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out, format)?;
        out.flush()
    }

    pub fn write_to<W: Write>(&self, out: &mut W, format: CurveFormat) -> Result<(), Error> {
        match format {
            CurveFormat::Csv => self.write_delimited(out, ','),
            CurveFormat::Tsv => self.write_delimited(out, '\t'),
            CurveFormat::Json => serde_json::to_writer_pretty(&mut *out, &self.snapshots)
                .map_err(Error::other),
        }
    }

    /// Extras become extra columns; a snapshot lacking one leaves the cell empty.
    fn write_delimited<W: Write>(&self, out: &mut W, sep: char) -> Result<(), Error> {
        let extra_keys: BTreeSet<&str> = self
            .snapshots
            .iter()
            .flat_map(|s| s.extras.keys().map(String::as_str))
            .collect();

        let mut columns = vec!["instances_seen", "mae", "rmse", "ram_hours", "seconds"];
        columns.extend(extra_keys.iter().copied());
        writeln!(out, "{}", columns.join(&sep.to_string()))?;

        for s in &self.snapshots {
            let mut cells = vec![
                s.instances_seen.to_string(),
                s.mae.to_string(),
                s.rmse.to_string(),
                s.ram_hours.to_string(),
                s.seconds.to_string(),
            ];
            cells.extend(
                extra_keys
                    .iter()
                    .map(|k| s.extras.get(*k).map(f64::to_string).unwrap_or_default()),
            );
            writeln!(out, "{}", cells.join(&sep.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snapshot(seen: u64, extra: Option<(&str, f64)>) -> Snapshot {
        let mut extras = BTreeMap::new();
        if let Some((k, v)) = extra {
            extras.insert(k.to_string(), v);
        }
        Snapshot {
            instances_seen: seen,
            mae: 0.5,
            rmse: 1.0,
            ram_hours: 0.0,
            seconds: 2.0,
            extras,
        }
    }

    #[test]
    fn csv_has_union_of_extra_columns() {
        let mut curve = LearningCurve::default();
        curve.push(snapshot(10, None));
        curve.push(snapshot(20, Some(("leaves", 3.0))));

        let mut buf = Vec::new();
        curve.write_to(&mut buf, CurveFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "instances_seen,mae,rmse,ram_hours,seconds,leaves");
        assert_eq!(lines[1], "10,0.5,1,0,2,");
        assert_eq!(lines[2], "20,0.5,1,0,2,3");
    }

    #[test]
    fn tsv_uses_tabs() {
        let mut curve = LearningCurve::default();
        curve.push(snapshot(1, None));
        let mut buf = Vec::new();
        curve.write_to(&mut buf, CurveFormat::Tsv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("instances_seen\tmae\trmse"));
    }

    #[test]
    fn json_export_writes_array_to_file() {
        let mut curve = LearningCurve::default();
        curve.push(snapshot(5, Some(("mean_target", 1.5))));
        assert_eq!(curve.latest().unwrap().instances_seen, 5);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");
        curve.export(&path, CurveFormat::Json).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0]["instances_seen"], 5);
        assert_eq!(parsed[0]["extras"]["mean_target"], 1.5);
    }
}
