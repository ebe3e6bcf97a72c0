//! Editable form state. Values stay raw text; the server validates them.

use api_types::{
    NumberValue,
    category::{CategoryPayload, CategoryView},
    expense::{ExpensePayload, ExpenseQuery, ExpenseView},
};
use chrono::NaiveDate;
use uuid::Uuid;

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Amounts go out as numeric strings so that `12.50` reaches the server as
/// typed.
fn number(value: &str) -> Option<NumberValue> {
    non_blank(value).map(NumberValue::Text)
}

fn amount_text(amount: f64) -> String {
    let text = format!("{amount:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpenseField {
    #[default]
    Description,
    Amount,
    Category,
    Date,
    Notes,
}

impl ExpenseField {
    pub const ALL: [Self; 5] = [
        Self::Description,
        Self::Amount,
        Self::Category,
        Self::Date,
        Self::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Date => "Date",
            Self::Notes => "Notes",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Description => Self::Amount,
            Self::Amount => Self::Category,
            Self::Category => Self::Date,
            Self::Date => Self::Notes,
            Self::Notes => Self::Description,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Description => Self::Notes,
            Self::Amount => Self::Description,
            Self::Category => Self::Amount,
            Self::Date => Self::Category,
            Self::Notes => Self::Date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub notes: String,
    pub focus: ExpenseField,
    /// Set while editing an existing expense.
    pub editing: Option<Uuid>,
}

impl ExpenseForm {
    /// Empty form with the date prefilled.
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            date: day.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn from_expense(expense: &ExpenseView) -> Self {
        Self {
            description: expense.description.clone(),
            amount: amount_text(expense.amount),
            category: expense.category.clone(),
            date: expense.date.format("%Y-%m-%d").to_string(),
            notes: expense.notes.clone().unwrap_or_default(),
            focus: ExpenseField::Description,
            editing: Some(expense.id),
        }
    }

    pub fn value(&self, field: ExpenseField) -> &str {
        match field {
            ExpenseField::Description => &self.description,
            ExpenseField::Amount => &self.amount,
            ExpenseField::Category => &self.category,
            ExpenseField::Date => &self.date,
            ExpenseField::Notes => &self.notes,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            ExpenseField::Description => &mut self.description,
            ExpenseField::Amount => &mut self.amount,
            ExpenseField::Category => &mut self.category,
            ExpenseField::Date => &mut self.date,
            ExpenseField::Notes => &mut self.notes,
        }
    }

    pub fn push(&mut self, ch: char) {
        self.focused_mut().push(ch);
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn payload(&self) -> ExpensePayload {
        ExpensePayload {
            description: non_blank(&self.description),
            amount: number(&self.amount),
            category: non_blank(&self.category),
            date: non_blank(&self.date),
            notes: non_blank(&self.notes),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryField {
    #[default]
    Name,
    Budget,
    Color,
}

impl CategoryField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Budget, Self::Color];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Budget => "Budget",
            Self::Color => "Color",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub budget: String,
    pub color: String,
    pub focus: CategoryField,
    /// Name of the category being edited; names cannot change.
    pub editing: Option<String>,
}

impl CategoryForm {
    pub fn create() -> Self {
        Self {
            color: "#3B82F6".to_string(),
            ..Self::default()
        }
    }

    pub fn edit(category: &CategoryView) -> Self {
        Self {
            name: category.name.clone(),
            budget: amount_text(category.budget),
            color: category.color.clone(),
            focus: CategoryField::Budget,
            editing: Some(category.name.clone()),
        }
    }

    pub fn value(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::Name => &self.name,
            CategoryField::Budget => &self.budget,
            CategoryField::Color => &self.color,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            CategoryField::Name => &mut self.name,
            CategoryField::Budget => &mut self.budget,
            CategoryField::Color => &mut self.color,
        }
    }

    pub fn push(&mut self, ch: char) {
        self.focused_mut().push(ch);
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = match (self.focus, self.editing.is_some()) {
            (CategoryField::Name, _) => CategoryField::Budget,
            (CategoryField::Budget, _) => CategoryField::Color,
            (CategoryField::Color, true) => CategoryField::Budget,
            (CategoryField::Color, false) => CategoryField::Name,
        };
    }

    pub fn payload(&self) -> CategoryPayload {
        CategoryPayload {
            name: non_blank(&self.name),
            budget: number(&self.budget),
            color: non_blank(&self.color),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterField {
    #[default]
    StartDate,
    EndDate,
    Category,
}

impl FilterField {
    pub const ALL: [Self; 3] = [Self::StartDate, Self::EndDate, Self::Category];

    pub fn label(self) -> &'static str {
        match self {
            Self::StartDate => "From",
            Self::EndDate => "To",
            Self::Category => "Category",
        }
    }
}

/// Listing filters shared by the expense list and the CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub start_date: String,
    pub end_date: String,
    pub category: String,
    pub focus: FilterField,
}

impl FilterForm {
    pub fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::Category => &self.category,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FilterField::StartDate => &mut self.start_date,
            FilterField::EndDate => &mut self.end_date,
            FilterField::Category => &mut self.category,
        }
    }

    pub fn push(&mut self, ch: char) {
        self.focused_mut().push(ch);
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            FilterField::StartDate => FilterField::EndDate,
            FilterField::EndDate => FilterField::Category,
            FilterField::Category => FilterField::StartDate,
        };
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| self.value(*field).trim().is_empty())
    }

    /// Filter part of the listing query; no paging.
    pub fn query(&self) -> ExpenseQuery {
        ExpenseQuery {
            start_date: non_blank(&self.start_date),
            end_date: non_blank(&self.end_date),
            category: non_blank(&self.category),
            ..ExpenseQuery::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn blank_fields_are_left_out_of_the_payload() {
        let mut form = ExpenseForm::for_day(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        for ch in "Lunch".chars() {
            form.push(ch);
        }
        form.next_field();
        for ch in "12.50".chars() {
            form.push(ch);
        }
        form.next_field();
        form.push(' ');

        let payload = form.payload();
        assert_eq!(payload.description.as_deref(), Some("Lunch"));
        assert_eq!(payload.amount, Some(NumberValue::Text("12.50".to_string())));
        assert_eq!(payload.category, None);
        assert_eq!(payload.date.as_deref(), Some("2024-03-09"));
        assert_eq!(payload.notes, None);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = ExpenseForm::default();
        form.prev_field();
        assert_eq!(form.focus, ExpenseField::Notes);
        form.next_field();
        assert_eq!(form.focus, ExpenseField::Description);
    }

    #[test]
    fn editing_an_expense_prefills_every_field() {
        let expense = ExpenseView {
            id: Uuid::new_v4(),
            description: "Taxi".to_string(),
            amount: 20.5,
            category: "transport".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut form = ExpenseForm::from_expense(&expense);
        assert_eq!(form.amount, "20.5");
        assert_eq!(form.date, "2024-02-01");
        assert_eq!(form.editing, Some(expense.id));

        form.pop();
        assert_eq!(form.description, "Tax");
    }

    #[test]
    fn category_edit_skips_the_name() {
        let category = CategoryView {
            name: "food".to_string(),
            budget: 100.0,
            color: "#EF4444".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut form = CategoryForm::edit(&category);
        assert_eq!(form.budget, "100");
        assert_eq!(form.focus, CategoryField::Budget);
        form.next_field();
        form.next_field();
        assert_eq!(form.focus, CategoryField::Budget);

        let mut create = CategoryForm::create();
        create.next_field();
        create.next_field();
        create.next_field();
        assert_eq!(create.focus, CategoryField::Name);
    }

    #[test]
    fn filter_query_keeps_only_set_values() {
        let mut filter = FilterForm::default();
        assert!(filter.is_empty());
        filter.next_field();
        for ch in "2024-03-31".chars() {
            filter.push(ch);
        }

        let query = filter.query();
        assert_eq!(query.start_date, None);
        assert_eq!(query.end_date.as_deref(), Some("2024-03-31"));
        assert_eq!(query.limit, None);
        assert!(!filter.is_empty());
    }
}
