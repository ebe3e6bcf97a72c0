use serde::Serialize;

use crate::{EngineError, Expense, ExpenseFilter, ResultEngine};

use super::Engine;

const HEADER: [&str; 5] = ["Description", "Amount", "Category", "Date", "Notes"];

#[derive(Serialize)]
struct ExportRow<'a> {
    description: &'a str,
    amount: String,
    category: &'a str,
    date: String,
    notes: &'a str,
}

impl<'a> From<&'a Expense> for ExportRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            description: &expense.description,
            amount: expense.amount.to_plain_string(),
            category: &expense.category,
            date: expense.date.format("%Y-%m-%d").to_string(),
            notes: expense.notes.as_deref().unwrap_or_default(),
        }
    }
}

/// Renders expenses as CSV, header first, one row per expense.
pub(crate) fn write_csv(expenses: &[Expense]) -> ResultEngine<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    writer
        .write_record(HEADER)
        .map_err(|err| EngineError::Export(err.to_string()))?;
    for expense in expenses {
        writer
            .serialize(ExportRow::from(expense))
            .map_err(|err| EngineError::Export(err.to_string()))?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))?;
    String::from_utf8(data).map_err(|err| EngineError::Export(err.to_string()))
}

impl Engine {
    /// CSV document of every expense matching `filter`, newest first.
    pub async fn export_csv(&self, filter: &ExpenseFilter) -> ResultEngine<String> {
        let expenses = self.all_expenses(filter).await?;
        write_csv(&expenses)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use crate::Money;

    use super::*;

    fn expense(description: &str, cents: i64, notes: Option<&str>) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            description: description.to_string(),
            amount: Money::new(cents),
            category: "food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            notes: notes.map(ToString::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = write_csv(&[]).unwrap();
        assert_eq!(csv, "Description,Amount,Category,Date,Notes\n");
    }

    #[test]
    fn rows_follow_input_order() {
        let csv = write_csv(&[
            expense("Pizza", 1250, Some("friday")),
            expense("Coffee", 300, None),
        ])
        .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            [
                "Description,Amount,Category,Date,Notes",
                "Pizza,12.5,food,2024-03-09,friday",
                "Coffee,3,food,2024-03-09,",
            ]
        );
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let csv = write_csv(&[expense("Bread, milk", 499, Some("said \"hi\""))]).unwrap();
        assert!(csv.contains("\"Bread, milk\",4.99,food,2024-03-09,\"said \"\"hi\"\"\""));
    }
}
