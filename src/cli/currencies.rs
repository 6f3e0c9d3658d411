use super::ui;
use crate::core::currency::CurrencyCode;
use comfy_table::Cell;

pub fn display_currencies() -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for code in CurrencyCode::ALL {
        table.add_row(vec![Cell::new(code.as_str()), Cell::new(code.name())]);
    }
    table.to_string()
}

pub fn run() -> anyhow::Result<()> {
    println!("{}", display_currencies());
    Ok(())
}
