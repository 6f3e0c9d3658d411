use super::ui;
use crate::core::currency::CurrencyCode;
use crate::core::rates::RateTable;
use crate::service::RateService;
use anyhow::Context;
use comfy_table::Cell;

pub fn display_rates(table: &RateTable) -> String {
    let mut output = ui::new_styled_table();
    output.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (per 1 {})", table.base)),
    ]);
    for code in CurrencyCode::ALL.into_iter().filter(|c| *c != table.base) {
        output.add_row(vec![
            Cell::new(code.as_str()),
            ui::format_optional_cell(table.rate(code.as_str()), |r| format!("{r:.4}")),
        ]);
    }
    format!(
        "Base: {}\n\n{}",
        ui::style_text(table.base.as_str(), ui::StyleType::Title),
        output
    )
}

/// Shows the current rate table, refetching first when `refresh` is set.
pub async fn run(service: &RateService, refresh: bool) -> anyhow::Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates");
    if refresh {
        service.refresh().await;
    } else {
        service.load_rates().await;
    }
    pb.finish_and_clear();

    let state = service.state();
    if let Some(e) = state.rates.error() {
        return Err(e.clone())
            .with_context(|| format!("Failed to fetch rates for {}", state.selection.base));
    }
    if let Some(table) = state.rates.table() {
        println!("{}", display_rates(table));
    }
    Ok(())
}
