use crate::error::Result;
use crate::types::{Platform, RawRow, TransactionRow};
use crate::util::{clean_text, parse_f64_safe, parse_i32_safe};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub missing_member_code: usize,
    pub defaulted_revenue: usize,
}

pub fn load_and_clean(path: impl AsRef<Path>) -> Result<(Vec<TransactionRow>, LoadReport)> {
    let path = path.as_ref();
    tracing::info!("Loading transactions from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_from_reader(file)
}

/// Read and normalize rows from any CSV source with a header line.
///
/// Bad revenue becomes `0`, unknown platform tags and blank regions become
/// unassigned. Only rows without a fiscal year or member code are dropped.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<TransactionRow>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut report = LoadReport::default();
    let mut rows: Vec<TransactionRow> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line = report.total_rows, error = %e, "unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let Some(fiscal_year) = parse_i32_safe(row.fiscal_year.as_deref()) else {
            report.parse_errors += 1;
            continue;
        };
        let member_code = clean_text(row.member_code);
        if member_code.is_empty() {
            report.missing_member_code += 1;
            continue;
        }

        let revenue = match parse_f64_safe(row.revenue.as_deref()) {
            Some(v) => v,
            None => {
                report.defaulted_revenue += 1;
                0.0
            }
        };
        let platform = row.platform.as_deref().and_then(Platform::from_tag);
        let region = Some(clean_text(row.region)).filter(|r| !r.is_empty());

        rows.push(TransactionRow {
            member_code,
            member_name: clean_text(row.member_name),
            member_group: clean_text(row.member_group),
            supplier: clean_text(row.supplier),
            brand: clean_text(row.brand),
            sub_family: clean_text(row.sub_family),
            supplier_group: clean_text(row.supplier_group),
            fiscal_year,
            revenue,
            platform,
            region,
        });
    }

    report.loaded_rows = rows.len();
    tracing::info!(
        total = report.total_rows,
        loaded = report.loaded_rows,
        parse_errors = report.parse_errors,
        "loaded transactions"
    );
    Ok((rows, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = concat!(
        "memberCode,memberName,memberGroup,supplier,brand,subFamily,",
        "supplierGroup,fiscalYear,revenue,platform,region\n",
    );

    #[test]
    fn normalizes_revenue_platform_and_region() {
        let csv = format!(
            "{HEADER}\
             M1,Garage Martin,G1,Bosch,,Freinage,SG,2024,\"1234,5\",DCA,  Nord \n\
             M1,Garage Martin,G1,Bosch,,Freinage,SG,2025,n/a,unknown,\n"
        );
        let (rows, report) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].revenue, 1234.5);
        assert_eq!(rows[0].platform, Some(Platform::Dca));
        assert_eq!(rows[0].region.as_deref(), Some("Nord"));
        assert_eq!(rows[1].revenue, 0.0);
        assert_eq!(rows[1].platform, None);
        assert_eq!(rows[1].region, None);
        assert_eq!(report.defaulted_revenue, 1);
    }

    #[test]
    fn skips_rows_without_year_or_member() {
        let csv = format!(
            "{HEADER}\
             M1,A,G,S,,F,SG,,100,,\n\
             ,B,G,S,,F,SG,2024,100,,\n\
             M2,C,G,S,,F,SG,2025,100,,\n"
        );
        let (rows, report) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].member_code, "M2");
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(report.missing_member_code, 1);
        assert_eq!(report.loaded_rows, 1);
    }

    #[test]
    fn short_lines_leave_trailing_columns_unset() {
        let csv = format!("{HEADER}M1,A,G,Bosch,Valeo,F,SG,2024,50\n");
        let (rows, _) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].revenue, 50.0);
        assert_eq!(rows[0].platform, None);
        assert_eq!(rows[0].region, None);
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}ACR9,A,G,S,,F,SG,2025,10,,\n").unwrap();
        let (rows, report) = load_and_clean(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(report.total_rows, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_and_clean("/nonexistent/transactions.csv").is_err());
    }
}
