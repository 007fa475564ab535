use balnea_core::error::BalneaError;
use balnea_core::model::CandidateRecord;

pub fn print(records: &[CandidateRecord]) -> Result<(), BalneaError> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{json}");
    Ok(())
}
