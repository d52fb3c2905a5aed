use crate::core::hill::{linspace, log_dose, simulate_response};
use crate::domain::model::{DoseResponseRow, DoseResponseTable, HillParams};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::validate_same_length;

/// Curve shown next to the interaction checker: `dose / (dose + 200) * 100`.
pub const QUICK_CURVE_PARAMS: HillParams = HillParams {
    max: 100.0,
    ec50: 200.0,
    n: 1.0,
};
pub const QUICK_CURVE_MAX_DOSE_MG: f64 = 1000.0;

pub fn build_table(
    drug: &str,
    doses: &[f64],
    responses: &[f64],
    with_antagonist: Option<&[f64]>,
) -> Result<DoseResponseTable> {
    validate_same_length("responses", doses.len(), responses.len())?;
    if let Some(values) = with_antagonist {
        validate_same_length("responses_with_antagonist", doses.len(), values.len())?;
    }

    let rows = doses
        .iter()
        .zip(responses)
        .enumerate()
        .map(|(i, (&dose, &response))| DoseResponseRow {
            dose,
            log_dose: log_dose(dose),
            response,
            response_with_antagonist: with_antagonist.map(|values| values[i]),
        })
        .collect();

    Ok(DoseResponseTable {
        drug: drug.to_string(),
        rows,
    })
}

pub fn quick_curve(drug: &str, points: usize) -> Result<DoseResponseTable> {
    let doses = linspace(0.0, QUICK_CURVE_MAX_DOSE_MG, points)?;
    let responses = simulate_response(&doses, &QUICK_CURVE_PARAMS)?;
    build_table(drug, &doses, &responses, None)
}

/// Render a table as delimited text (`b','` for CSV, `b'\t'` for TSV).
pub fn render_delimited(table: &DoseResponseTable, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    let with_antagonist = table.has_antagonist_column();
    let mut header = vec!["dose", "log_dose", "response"];
    if with_antagonist {
        header.push("response_with_antagonist");
    }
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![
            row.dose.to_string(),
            format!("{:.6}", row.log_dose),
            format!("{:.4}", row.response),
        ];
        if with_antagonist {
            record.push(
                row.response_with_antagonist
                    .map(|value| format!("{:.4}", value))
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SimError::processing(format!("failed to flush table writer: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| SimError::processing(format!("table is not valid UTF-8: {}", e)))
}
