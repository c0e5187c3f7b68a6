use super::model::{Dataset, RawRecord, Record, RemoteRatio};

// ---------------------------------------------------------------------------
// remote_ratio code → category
// ---------------------------------------------------------------------------

/// Map a raw `remote_ratio` code onto its category.
///
/// Codes are compared numerically, so `"100"` and `"100.0"` are the same.
/// Anything outside {0, 50, 100} is passed through as
/// [`RemoteRatio::Unmapped`] with the trimmed raw text.
pub fn normalize_remote_ratio(code: &str) -> RemoteRatio {
    let trimmed = code.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v == 0.0 => RemoteRatio::NotRemote,
        Ok(v) if v == 50.0 => RemoteRatio::PartiallyRemote,
        Ok(v) if v == 100.0 => RemoteRatio::FullyRemote,
        _ => RemoteRatio::Unmapped(trimmed.to_string()),
    }
}

fn normalize_record(raw: RawRecord) -> Record {
    Record {
        year: raw.year,
        work_year: raw.work_year,
        seniority: raw.seniority,
        employment_type: raw.employment_type,
        company_size: raw.company_size,
        job_title: raw.job_title,
        remote_ratio: normalize_remote_ratio(&raw.remote_ratio),
        employee_residence_iso3: raw.employee_residence_iso3,
        salary_in_usd: raw.salary_in_usd,
    }
}

/// One-time load transform: normalize every row and index the result.
pub fn normalize(rows: Vec<RawRecord>) -> Dataset {
    let records: Vec<Record> = rows.into_iter().map(normalize_record).collect();

    let unmapped = records
        .iter()
        .filter(|r| matches!(r.remote_ratio, RemoteRatio::Unmapped(_)))
        .count();
    if unmapped > 0 {
        log::debug!("{unmapped} rows carry a remote_ratio code outside {{0, 50, 100}}");
    }

    Dataset::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(remote_ratio: &str) -> RawRecord {
        RawRecord {
            year: None,
            work_year: 2023,
            seniority: "Mid".into(),
            employment_type: "FT".into(),
            company_size: "M".into(),
            job_title: "Data Engineer".into(),
            remote_ratio: remote_ratio.into(),
            employee_residence_iso3: "DEU".into(),
            salary_in_usd: 90_000.0,
        }
    }

    #[test]
    fn known_codes_map_to_categories() {
        assert_eq!(normalize_remote_ratio("0"), RemoteRatio::NotRemote);
        assert_eq!(normalize_remote_ratio("50"), RemoteRatio::PartiallyRemote);
        assert_eq!(normalize_remote_ratio("100"), RemoteRatio::FullyRemote);
    }

    #[test]
    fn float_formatted_codes_still_map() {
        assert_eq!(normalize_remote_ratio(" 100.0 "), RemoteRatio::FullyRemote);
        assert_eq!(normalize_remote_ratio("50.0"), RemoteRatio::PartiallyRemote);
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(normalize_remote_ratio("75"), RemoteRatio::Unmapped("75".into()));
        assert_eq!(normalize_remote_ratio(""), RemoteRatio::Unmapped(String::new()));
        assert_eq!(normalize_remote_ratio("hybrid"), RemoteRatio::Unmapped("hybrid".into()));
    }

    #[test]
    fn normalize_keeps_row_order_and_fields() {
        let ds = normalize(vec![raw("0"), raw("75"), raw("100")]);
        let ratios: Vec<_> = ds.records().iter().map(|r| r.remote_ratio.clone()).collect();
        assert_eq!(
            ratios,
            vec![
                RemoteRatio::NotRemote,
                RemoteRatio::Unmapped("75".into()),
                RemoteRatio::FullyRemote,
            ]
        );
        assert_eq!(ds.records()[1].employee_residence_iso3, "DEU");
    }
}
