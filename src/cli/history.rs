use super::ui;
use crate::core::history::daily_changes;
use crate::service::{HistoryState, RateService, Selection};
use comfy_table::Cell;

/// Renders the history section. A failed history is a notice, not an error.
pub fn display_history(selection: Selection, history: &HistoryState) -> Option<String> {
    match history {
        HistoryState::Ready(points) => {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Date"),
                ui::header_cell(&format!("{} per {}", selection.target, selection.base)),
                ui::header_cell("Change"),
            ]);
            for (point, change) in points.iter().zip(daily_changes(points)) {
                table.add_row(vec![
                    Cell::new(point.date.format("%Y-%m-%d")),
                    ui::format_optional_cell(Some(point.rate), |r| format!("{r:.4}")),
                    change.map_or(Cell::new(""), ui::change_cell),
                ]);
            }
            Some(format!(
                "{}\n\n{}",
                ui::style_text("Last 7 days", ui::StyleType::Title),
                table
            ))
        }
        HistoryState::Error(e) => Some(ui::style_text(
            &format!("Historical rates unavailable: {e}"),
            ui::StyleType::Subtle,
        )),
        HistoryState::Idle | HistoryState::Loading => None,
    }
}

pub async fn run(service: &RateService) -> anyhow::Result<()> {
    let pb = ui::new_spinner("Fetching historical rates");
    service.load_history().await;
    pb.finish_and_clear();

    let state = service.state();
    if let Some(output) = display_history(state.selection, &state.history) {
        println!("{output}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use crate::core::rates::{HistoricalPoint, HistoryError, RateFetchError};
    use chrono::NaiveDate;

    fn selection() -> Selection {
        Selection {
            base: CurrencyCode::Usd,
            target: CurrencyCode::Eur,
        }
    }

    #[test]
    fn test_display_ready_history() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let points = (4..=10)
            .map(|day| HistoricalPoint {
                date: d(day),
                rate: 0.9 + f64::from(day) / 1000.0,
            })
            .collect();

        let output = display_history(selection(), &HistoryState::Ready(points)).unwrap();
        assert!(output.contains("EUR per USD"));
        assert!(output.contains("2024-05-04"));
        assert!(output.contains("2024-05-10"));
        assert!(output.contains("0.9100"));
    }

    #[test]
    fn test_display_history_error_as_notice() {
        let error = HistoryError::Fetch {
            date: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
            source: RateFetchError::Http {
                status: 500,
                message: "HTTP error! status: 500".to_string(),
            },
        };
        let output = display_history(selection(), &HistoryState::Error(error)).unwrap();
        assert!(output.contains("Historical rates unavailable"));
        assert!(output.contains("2024-05-07"));
    }

    #[test]
    fn test_nothing_to_display_while_loading() {
        assert!(display_history(selection(), &HistoryState::Loading).is_none());
        assert!(display_history(selection(), &HistoryState::Idle).is_none());
    }
}
