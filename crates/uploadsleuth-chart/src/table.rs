/// CSV export of a frequency series: `start,count`, one row per interval.
use crate::error::Result;
use std::io::Write;
use uploadsleuth_core::model::FrequencySeries;

pub fn write_csv<W: Write>(out: W, series: &FrequencySeries) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if series.is_empty() {
        writer.write_record(["start", "count"])?;
    }
    for bucket in series {
        writer.serialize(bucket)?;
    }
    writer.flush()?;
    Ok(())
}
