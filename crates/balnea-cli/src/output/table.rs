use balnea_core::model::CandidateRecord;

pub fn candidates(records: &[CandidateRecord]) {
    if records.is_empty() {
        println!("No records extracted.");
        return;
    }

    let max_code = records.iter().map(|r| r.code.len()).max().unwrap_or(4);
    let max_status = records.iter().map(|r| r.status.len()).max().unwrap_or(6);

    for r in records {
        println!(
            "{:<code_w$}  {:<status_w$}  {:<10}  {}",
            r.code,
            r.status,
            r.date,
            r.beach,
            code_w = max_code,
            status_w = max_status,
        );
    }
    println!();
    println!("{} record(s)", records.len());
}
