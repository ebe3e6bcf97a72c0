use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{self, Event, KeyEvent};
use tokio::task::JoinSet;

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

use api_types::{
    category::CategoryView,
    expense::{ExpenseQuery, ExpenseView, Pagination},
    stats::SummaryResponse,
};

mod dashboard;
mod forms;

pub use dashboard::{DashboardState, TimeRange, Totals};
pub use forms::{CategoryField, CategoryForm, ExpenseField, ExpenseForm, FilterField, FilterForm};

const PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Expenses,
    AddExpense,
    Categories,
}

impl Section {
    pub const ALL: [Self; 4] = [
        Self::Dashboard,
        Self::Expenses,
        Self::AddExpense,
        Self::Categories,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Expenses => "Expenses",
            Self::AddExpense => "Add Expense",
            Self::Categories => "Categories",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Expenses,
            Self::Expenses => Self::AddExpense,
            Self::AddExpense => Self::Categories,
            Self::Categories => Self::Dashboard,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Dashboard => Self::Categories,
            Self::Expenses => Self::Dashboard,
            Self::AddExpense => Self::Expenses,
            Self::Categories => Self::AddExpense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message box; it blocks input until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpensesMode {
    #[default]
    List,
    Filter,
    Edit,
    ConfirmDelete,
}

#[derive(Debug, Default)]
pub struct ExpensesState {
    pub items: Vec<ExpenseView>,
    pub pagination: Option<Pagination>,
    pub page: u64,
    pub selected: usize,
    pub mode: ExpensesMode,
    /// Filter being typed.
    pub filter: FilterForm,
    /// Filter in effect.
    pub applied: FilterForm,
    pub form: ExpenseForm,
}

impl ExpensesState {
    /// Listing query for the current page and applied filter.
    pub fn query(&self) -> ExpenseQuery {
        ExpenseQuery {
            limit: Some(PAGE_SIZE.to_string()),
            page: Some(self.page.max(1).to_string()),
            ..self.applied.query()
        }
    }

    pub fn selected_expense(&self) -> Option<&ExpenseView> {
        self.items.get(self.selected)
    }

    fn replace(&mut self, items: Vec<ExpenseView>, pagination: Pagination) {
        self.items = items;
        self.page = pagination.page;
        self.pagination = Some(pagination);
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn has_next_page(&self) -> bool {
        self.pagination.is_some_and(|p| p.page < p.pages)
    }

    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoriesMode {
    #[default]
    List,
    Form,
    ConfirmDelete,
}

#[derive(Debug, Default)]
pub struct CategoriesState {
    pub items: Vec<CategoryView>,
    pub selected: usize,
    pub mode: CategoriesMode,
    pub form: CategoryForm,
}

impl CategoriesState {
    pub fn selected_category(&self) -> Option<&CategoryView> {
        self.items.get(self.selected)
    }

    fn replace(&mut self, items: Vec<CategoryView>) {
        self.items = items;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub expenses: ExpensesState,
    pub add: ExpenseForm,
    pub categories: CategoriesState,
    pub summary: Option<SummaryResponse>,
    pub dashboard: DashboardState,
    pub notice: Option<Notice>,
    pub connected: bool,
    pub last_refresh: Option<DateTime<Local>>,
    pub base_url: String,
}

impl AppState {
    fn new(base_url: String, today: NaiveDate) -> Self {
        Self {
            section: Section::Dashboard,
            expenses: ExpensesState {
                page: 1,
                ..ExpensesState::default()
            },
            add: ExpenseForm::for_day(today),
            categories: CategoriesState::default(),
            summary: None,
            dashboard: DashboardState::default(),
            notice: None,
            connected: false,
            last_refresh: None,
            base_url,
        }
    }

    /// True while keystrokes go to a text field.
    pub fn is_typing(&self) -> bool {
        match self.section {
            Section::AddExpense => true,
            Section::Expenses => matches!(
                self.expenses.mode,
                ExpensesMode::Filter | ExpensesMode::Edit
            ),
            Section::Categories => self.categories.mode == CategoriesMode::Form,
            Section::Dashboard => false,
        }
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(self.summary.as_ref(), &self.categories.items)
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        });
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let state = AppState::new(config.base_url.clone(), today());

        Ok(Self {
            config,
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.start_and_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn start_and_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        match self.client.health().await {
            Ok(_) => {
                self.state.connected = true;
                self.reload().await?;
            }
            Err(err) => self.state.error(err.describe()),
        }
        self.event_loop(terminal).await
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key).await?;
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }
        if self.state.notice.is_some() {
            if action != AppAction::None {
                self.state.notice = None;
            }
            return Ok(());
        }
        if self.state.is_typing() {
            return self.handle_form_action(action).await;
        }

        match action {
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Left => self.state.section = self.state.section.prev(),
            AppAction::Right => self.state.section = self.state.section.next(),
            AppAction::Input(ch @ '1'..='4') => {
                let index = ch as usize - '1' as usize;
                self.state.section = Section::ALL[index];
            }
            AppAction::Input('r') => self.reload().await?,
            _ => match self.state.section {
                Section::Dashboard => self.handle_dashboard(action).await?,
                Section::Expenses => self.handle_expenses(action).await?,
                Section::Categories => self.handle_categories(action).await?,
                Section::AddExpense => {}
            },
        }
        Ok(())
    }

    async fn handle_dashboard(&mut self, action: AppAction) -> Result<()> {
        let range = match action {
            AppAction::Input('w') => TimeRange::Week,
            AppAction::Input('m') => TimeRange::Month,
            AppAction::Input('y') => TimeRange::Year,
            _ => return Ok(()),
        };
        if range != self.state.dashboard.range {
            self.state.dashboard.range = range;
            self.reload().await?;
        }
        Ok(())
    }

    async fn handle_expenses(&mut self, action: AppAction) -> Result<()> {
        let expenses = &mut self.state.expenses;
        if expenses.mode == ExpensesMode::ConfirmDelete {
            expenses.mode = ExpensesMode::List;
            if action == AppAction::Input('y') {
                self.delete_selected_expense().await?;
            }
            return Ok(());
        }

        match action {
            AppAction::Up | AppAction::Input('k') => expenses.select_prev(),
            AppAction::Down | AppAction::Input('j') => expenses.select_next(),
            AppAction::Input('n') if expenses.has_next_page() => {
                let page = expenses.page + 1;
                self.turn_expenses_page(page).await;
            }
            AppAction::Input('p') if expenses.page > 1 => {
                let page = expenses.page - 1;
                self.turn_expenses_page(page).await;
            }
            AppAction::Input('/') => {
                expenses.filter = expenses.applied.clone();
                expenses.mode = ExpensesMode::Filter;
            }
            AppAction::Input('c') if !expenses.applied.is_empty() => {
                expenses.applied = FilterForm::default();
                expenses.page = 1;
                self.load_expenses().await;
            }
            AppAction::Input('e') | AppAction::Submit => {
                if let Some(expense) = expenses.selected_expense() {
                    expenses.form = ExpenseForm::from_expense(expense);
                    expenses.mode = ExpensesMode::Edit;
                }
            }
            AppAction::Input('d') if expenses.selected_expense().is_some() => {
                expenses.mode = ExpensesMode::ConfirmDelete;
            }
            AppAction::Input('x') => self.export_csv().await,
            _ => {}
        }
        Ok(())
    }

    async fn handle_categories(&mut self, action: AppAction) -> Result<()> {
        let categories = &mut self.state.categories;
        if categories.mode == CategoriesMode::ConfirmDelete {
            categories.mode = CategoriesMode::List;
            if action == AppAction::Input('y') {
                self.delete_selected_category().await?;
            }
            return Ok(());
        }

        match action {
            AppAction::Up | AppAction::Input('k') => categories.select_prev(),
            AppAction::Down | AppAction::Input('j') => categories.select_next(),
            AppAction::Input('a') => {
                categories.form = CategoryForm::create();
                categories.mode = CategoriesMode::Form;
            }
            AppAction::Input('e') | AppAction::Submit => {
                if let Some(category) = categories.selected_category() {
                    categories.form = CategoryForm::edit(category);
                    categories.mode = CategoriesMode::Form;
                }
            }
            AppAction::Input('d') if categories.selected_category().is_some() => {
                categories.mode = CategoriesMode::ConfirmDelete;
            }
            _ => {}
        }
        Ok(())
    }

    /// Keystrokes while a form has focus.
    async fn handle_form_action(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => self.cancel_form(),
            AppAction::Submit => self.submit_form().await?,
            AppAction::NextField => self.with_form(FormEdit::Next),
            AppAction::PrevField => self.with_form(FormEdit::Prev),
            AppAction::Backspace => self.with_form(FormEdit::Pop),
            AppAction::Input(ch) => self.with_form(FormEdit::Push(ch)),
            _ => {}
        }
        Ok(())
    }

    fn with_form(&mut self, edit: FormEdit) {
        let state = &mut self.state;
        match (state.section, state.expenses.mode) {
            (Section::AddExpense, _) => edit.apply_expense(&mut state.add),
            (Section::Expenses, ExpensesMode::Edit) => edit.apply_expense(&mut state.expenses.form),
            (Section::Expenses, ExpensesMode::Filter) => {
                let filter = &mut state.expenses.filter;
                match edit {
                    FormEdit::Next | FormEdit::Prev => filter.next_field(),
                    FormEdit::Pop => filter.pop(),
                    FormEdit::Push(ch) => filter.push(ch),
                }
            }
            (Section::Categories, _) => {
                let form = &mut state.categories.form;
                match edit {
                    FormEdit::Next | FormEdit::Prev => form.next_field(),
                    FormEdit::Pop => form.pop(),
                    // The name of an existing category is fixed.
                    FormEdit::Push(_) if form.focus == CategoryField::Name && form.editing.is_some() => {}
                    FormEdit::Push(ch) => form.push(ch),
                }
            }
            _ => {}
        }
    }

    fn cancel_form(&mut self) {
        match self.state.section {
            Section::AddExpense => {
                self.state.add = ExpenseForm::for_day(today());
                self.state.section = Section::Dashboard;
            }
            Section::Expenses => self.state.expenses.mode = ExpensesMode::List,
            Section::Categories => self.state.categories.mode = CategoriesMode::List,
            Section::Dashboard => {}
        }
    }

    async fn submit_form(&mut self) -> Result<()> {
        match (self.state.section, self.state.expenses.mode) {
            (Section::AddExpense, _) => {
                let payload = self.state.add.payload();
                match self.client.create_expense(&payload).await {
                    Ok(_) => {
                        self.state.add = ExpenseForm::for_day(today());
                        self.reload().await?;
                        self.state.info("Expense added successfully");
                    }
                    Err(err) => self.state.error(err.describe()),
                }
            }
            (Section::Expenses, ExpensesMode::Filter) => {
                let expenses = &mut self.state.expenses;
                expenses.applied = expenses.filter.clone();
                expenses.page = 1;
                expenses.selected = 0;
                expenses.mode = ExpensesMode::List;
                self.load_expenses().await;
            }
            (Section::Expenses, ExpensesMode::Edit) => {
                let form = &self.state.expenses.form;
                let Some(id) = form.editing else {
                    return Ok(());
                };
                let payload = form.payload();
                match self.client.update_expense(id, &payload).await {
                    Ok(_) => {
                        self.state.expenses.mode = ExpensesMode::List;
                        self.reload().await?;
                    }
                    Err(err) => self.state.error(err.describe()),
                }
            }
            (Section::Categories, _) => {
                let form = &self.state.categories.form;
                let payload = form.payload();
                let result = match &form.editing {
                    Some(name) => self.client.update_category(name, &payload).await,
                    None => self.client.create_category(&payload).await,
                };
                match result {
                    Ok(_) => {
                        self.state.categories.mode = CategoriesMode::List;
                        self.reload().await?;
                    }
                    Err(err) => self.state.error(err.describe()),
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn delete_selected_expense(&mut self) -> Result<()> {
        let Some(id) = self.state.expenses.selected_expense().map(|e| e.id) else {
            return Ok(());
        };
        match self.client.delete_expense(id).await {
            Ok(_) => self.reload().await?,
            Err(err) => self.state.error(format!("Failed to delete expense. {}", err.describe())),
        }
        Ok(())
    }

    async fn delete_selected_category(&mut self) -> Result<()> {
        let Some(name) = self
            .state
            .categories
            .selected_category()
            .map(|c| c.name.clone())
        else {
            return Ok(());
        };
        match self.client.delete_category(&name).await {
            Ok(_) => self.reload().await?,
            Err(err) => self.state.error(format!("Failed to delete category. {}", err.describe())),
        }
        Ok(())
    }

    /// Re-fetches expenses, categories and the summary concurrently, then the
    /// budget status of every category. Nothing is replaced unless all three
    /// requests succeed.
    async fn reload(&mut self) -> Result<()> {
        let query = self.state.expenses.query();
        let range = self.state.dashboard.range.query(today());

        let (expenses, categories, summary) = tokio::join!(
            self.client.list_expenses(&query),
            self.client.list_categories(),
            self.client.summary(&range),
        );

        let (expenses, categories, summary) = match (expenses, categories, summary) {
            (Ok(expenses), Ok(categories), Ok(summary)) => (expenses, categories, summary),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                self.report_failure(&err);
                return Ok(());
            }
        };

        let budgets = self.fetch_budgets(&categories).await?;

        self.state
            .expenses
            .replace(expenses.expenses, expenses.pagination);
        self.state.categories.replace(categories);
        self.state.summary = Some(summary);
        self.state.dashboard.budgets = budgets;
        self.state.connected = true;
        self.state.last_refresh = Some(Local::now());
        Ok(())
    }

    /// One request per category; a failed one falls back to a zero row.
    async fn fetch_budgets(
        &self,
        categories: &[CategoryView],
    ) -> Result<Vec<api_types::stats::BudgetStatusView>> {
        let range = self.state.dashboard.range.query(today());
        let mut tasks = JoinSet::new();
        for category in categories {
            let client = self.client.clone();
            let range = range.clone();
            let category = category.clone();
            tasks.spawn(async move {
                match client.budget_status(&category.name, &range).await {
                    Ok(status) => status,
                    Err(_) => dashboard::fallback_status(&category),
                }
            });
        }

        let mut budgets = Vec::with_capacity(categories.len());
        while let Some(status) = tasks.join_next().await {
            budgets.push(status?);
        }
        budgets.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(budgets)
    }

    /// Returns `false` when the listing could not be fetched.
    async fn load_expenses(&mut self) -> bool {
        let query = self.state.expenses.query();
        match self.client.list_expenses(&query).await {
            Ok(listing) => {
                self.state
                    .expenses
                    .replace(listing.expenses, listing.pagination);
                true
            }
            Err(err) => {
                self.report_failure(&err);
                false
            }
        }
    }

    /// Shows `page` of the listing; stays on the current page if it fails.
    async fn turn_expenses_page(&mut self, page: u64) {
        let previous = std::mem::replace(&mut self.state.expenses.page, page);
        if !self.load_expenses().await {
            self.state.expenses.page = previous;
        }
    }

    async fn export_csv(&mut self) {
        let query = self.state.expenses.applied.query();
        let csv = match self.client.export_csv(&query).await {
            Ok(csv) => csv,
            Err(err) => {
                self.report_failure(&err);
                return;
            }
        };
        let rows = csv.lines().count().saturating_sub(1);
        match std::fs::write(&self.config.export_path, csv) {
            Ok(()) => self
                .state
                .info(format!("Exported {rows} expenses to {}", self.config.export_path)),
            Err(err) => self.state.error(format!("Failed to export expenses: {err}")),
        }
    }

    fn report_failure(&mut self, err: &ClientError) {
        if matches!(err, ClientError::Transport(_)) {
            self.state.connected = false;
        }
        self.state.error(err.describe());
    }
}

#[derive(Debug, Clone, Copy)]
enum FormEdit {
    Next,
    Prev,
    Pop,
    Push(char),
}

impl FormEdit {
    fn apply_expense(self, form: &mut ExpenseForm) {
        match self {
            Self::Next => form.next_field(),
            Self::Prev => form.prev_field(),
            Self::Pop => form.pop(),
            Self::Push(ch) => form.push(ch),
        }
    }
}
