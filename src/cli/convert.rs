use super::{history, ui};
use crate::core::convert::{Conversion, parse_amount};
use crate::service::RateService;
use anyhow::{Context, bail};

pub fn display_conversion(conversion: &Conversion) -> String {
    match conversion {
        Conversion::Converted {
            base, target, rate, ..
        } => format!(
            "{}\n{}",
            ui::style_text(
                &conversion.summary().unwrap_or_default(),
                ui::StyleType::Result
            ),
            ui::style_text(
                &format!("1 {base} = {rate:.4} {target}"),
                ui::StyleType::Subtle
            )
        ),
        Conversion::RateUnavailable { base, target } => ui::style_text(
            &format!("No {target} rate available for base {base}"),
            ui::StyleType::Error,
        ),
        Conversion::InvalidAmount => ui::style_text("Invalid amount", ui::StyleType::Error),
        Conversion::Unavailable => {
            ui::style_text("Exchange rates unavailable", ui::StyleType::Error)
        }
    }
}

pub async fn run(
    service: &RateService,
    amount: &str,
    swap: bool,
    with_history: bool,
) -> anyhow::Result<()> {
    if parse_amount(amount).is_none() {
        bail!("Invalid amount: {amount:?}");
    }

    let pb = ui::new_spinner("Fetching exchange rates");
    if swap {
        service.swap_selection();
    }
    if with_history {
        tokio::join!(service.load_rates(), service.load_history());
    } else {
        service.load_rates().await;
    }
    pb.finish_and_clear();

    let state = service.state();
    if let Some(e) = state.rates.error() {
        return Err(e.clone()).with_context(|| {
            format!(
                "Failed to fetch exchange rates for {}",
                state.selection.base
            )
        });
    }

    println!("{}", display_conversion(&service.convert(amount)));

    if with_history {
        if let Some(output) = history::display_history(state.selection, &state.history) {
            println!("\n{output}");
        }
    }
    Ok(())
}
