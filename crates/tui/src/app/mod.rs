use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use docstore::DocumentStore;
use engine::{Engine, EngineError};

use api_types::budget::{Budget, BudgetItem, BudgetItemNew, BudgetItemUpdate, BudgetNew};
use api_types::category::{Category, CategorySave};
use api_types::transaction::{Transaction, TransactionNew};
use api_types::user::User;
use api_types::{EntityRef, Period};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    quick_add, ui,
    view::{SortKey, SortState, TransactionFilters, TransactionRow},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Transactions,
    Categories,
    Budget,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Categories => "Categories",
            Self::Budget => "Budget",
        }
    }
}

/// What the one-line input at the bottom is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    QuickAdd,
    FilterText,
    NewCategory,
    RenameCategory { id: String },
    NewBudgetItem,
    EditItemAmount { id: String },
}

impl InputPurpose {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::QuickAdd => "Nuova transazione (importo descrizione [#categoria] [@voce])",
            Self::FilterText => "Filtra per descrizione",
            Self::NewCategory => "Nome della nuova categoria",
            Self::RenameCategory { .. } => "Nuovo nome della categoria",
            Self::NewBudgetItem => "Nuova voce (nome importo)",
            Self::EditItemAmount { .. } => "Nuovo importo pianificato",
        }
    }
}

#[derive(Debug)]
pub struct InputState {
    pub purpose: InputPurpose,
    pub buffer: String,
}

#[derive(Debug, Default)]
pub struct TransactionsState {
    pub items: Vec<Transaction>,
    pub budget_items: Vec<BudgetItem>,
    pub categories: Vec<Category>,
    pub sort: SortState,
    pub filters: TransactionFilters,
    pub selected: usize,
    pub error: Option<String>,
}

impl TransactionsState {
    /// The derived list the screen renders: join, stable sort, filter.
    pub fn visible(&self) -> Vec<TransactionRow> {
        crate::view::visible_rows(
            &self.items,
            &self.budget_items,
            &self.categories,
            self.sort,
            &self.filters,
        )
    }

    fn select_next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Cycles the category predicate through every category and back to
    /// unset.
    fn cycle_category_filter(&mut self) {
        self.filters.category_id = next_id(&self.filters.category_id, || {
            self.categories.iter().map(|category| category.id.clone())
        });
        self.selected = 0;
    }

    fn cycle_budget_item_filter(&mut self) {
        self.filters.budget_item_id = next_id(&self.filters.budget_item_id, || {
            self.budget_items.iter().map(|item| item.id.clone())
        });
        self.selected = 0;
    }
}

/// Advances `current` through the id sequence, wrapping to unset.
fn next_id<I>(current: &Option<String>, ids: impl Fn() -> I) -> Option<String>
where
    I: Iterator<Item = String>,
{
    match current {
        None => ids().next(),
        Some(active) => {
            let mut ids = ids().skip_while(|id| id != active);
            ids.next();
            ids.next()
        }
    }
}

#[derive(Debug, Default)]
pub struct CategoriesState {
    pub items: Vec<Category>,
    pub selected: usize,
    pub error: Option<String>,
}

impl CategoriesState {
    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn selected_category(&self) -> Option<&Category> {
        self.items.get(self.selected)
    }
}

#[derive(Debug, Default)]
pub struct BudgetState {
    pub budget: Option<Budget>,
    pub selected: usize,
    pub error: Option<String>,
}

impl BudgetState {
    fn items(&self) -> &[BudgetItem] {
        self.budget
            .as_ref()
            .map(|budget| budget.budget_items.as_slice())
            .unwrap_or_default()
    }

    fn select_next(&mut self) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn selected_item(&self) -> Option<&BudgetItem> {
        self.items().get(self.selected)
    }
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub period: Period,
    pub user: Option<User>,
    pub transactions: TransactionsState,
    pub categories: CategoriesState,
    pub budget: BudgetState,
    pub input: Option<InputState>,
    /// Blocking notice for failed destructive operations; the next key
    /// dismisses it.
    pub notice: Option<String>,
    pub sidebar: bool,
}

pub struct App<S> {
    config: AppConfig,
    engine: Engine<S>,
    theme: ui::Theme,
    pub state: AppState,
    should_quit: bool,
}

impl<S: DocumentStore> App<S> {
    pub fn new(config: AppConfig, engine: Engine<S>) -> Self {
        let today = Local::now().date_naive();
        let state = AppState {
            section: Section::Transactions,
            period: Period::from_date(today),
            user: None,
            transactions: TransactionsState::default(),
            categories: CategoriesState::default(),
            budget: BudgetState::default(),
            input: None,
            notice: None,
            sidebar: config.sidebar,
        };
        let theme = ui::Theme::from_name(&config.theme);

        Self {
            config,
            engine,
            theme,
            state,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.bootstrap().await?;
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn bootstrap(&mut self) -> Result<()> {
        let user = self.engine.ensure_user(&self.config.username).await?;
        self.state.user = Some(user);
        self.reload_section().await;
        Ok(())
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state, &self.theme))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // A blocking notice swallows the key that dismisses it.
        if self.state.notice.take().is_some() {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        // Text entry first, so every character stays available.
        if self.state.input.is_some() {
            match key.code {
                KeyCode::Esc => {
                    self.state.input = None;
                }
                KeyCode::Enter => {
                    if let Some(input) = self.state.input.take() {
                        self.submit_input(input).await;
                    }
                }
                KeyCode::Backspace => {
                    if let Some(input) = &mut self.state.input {
                        input.buffer.pop();
                    }
                }
                KeyCode::Char(ch) => {
                    if let Some(input) = &mut self.state.input {
                        input.buffer.push(ch);
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        match ui::keymap::map_key(key) {
            ui::keymap::AppAction::Quit => {
                self.should_quit = true;
            }
            ui::keymap::AppAction::Cancel => {}
            ui::keymap::AppAction::Up => self.select_prev(),
            ui::keymap::AppAction::Down => self.select_next(),
            ui::keymap::AppAction::Input(ch) => self.handle_char(ch).await,
            ui::keymap::AppAction::None => {}
        }

        Ok(())
    }

    fn select_next(&mut self) {
        match self.state.section {
            Section::Transactions => self.state.transactions.select_next(),
            Section::Categories => self.state.categories.select_next(),
            Section::Budget => self.state.budget.select_next(),
        }
    }

    fn select_prev(&mut self) {
        match self.state.section {
            Section::Transactions => self.state.transactions.select_prev(),
            Section::Categories => self.state.categories.select_prev(),
            Section::Budget => self.state.budget.select_prev(),
        }
    }

    async fn handle_char(&mut self, ch: char) {
        match ch {
            't' | 'T' => self.switch_section(Section::Transactions).await,
            'c' | 'C' => self.switch_section(Section::Categories).await,
            'g' | 'G' => self.switch_section(Section::Budget).await,
            '[' => self.shift_period(Period::previous).await,
            ']' => self.shift_period(Period::next).await,
            'r' | 'R' => self.reload_section().await,
            'j' => self.select_next(),
            'k' => self.select_prev(),
            _ => match self.state.section {
                Section::Transactions => self.handle_transactions_char(ch),
                Section::Categories => self.handle_categories_char(ch).await,
                Section::Budget => self.handle_budget_char(ch).await,
            },
        }
    }

    async fn switch_section(&mut self, section: Section) {
        self.state.section = section;
        self.reload_section().await;
    }

    async fn shift_period(&mut self, shift: fn(Period) -> Period) {
        self.state.period = shift(self.state.period);
        self.reload_section().await;
    }

    fn handle_transactions_char(&mut self, ch: char) {
        let transactions = &mut self.state.transactions;
        match ch {
            '1' => transactions.sort.request(SortKey::Date),
            '2' => transactions.sort.request(SortKey::Description),
            '3' => transactions.sort.request(SortKey::BudgetItem),
            '4' => transactions.sort.request(SortKey::Category),
            '5' => transactions.sort.request(SortKey::Amount),
            '/' => {
                self.state.input = Some(InputState {
                    purpose: InputPurpose::FilterText,
                    buffer: transactions.filters.text.clone(),
                });
            }
            'f' => transactions.cycle_category_filter(),
            'i' => transactions.cycle_budget_item_filter(),
            'x' => {
                transactions.filters.clear();
                transactions.selected = 0;
            }
            'n' => {
                self.state.input = Some(InputState {
                    purpose: InputPurpose::QuickAdd,
                    buffer: String::new(),
                });
            }
            _ => {}
        }
    }

    async fn handle_categories_char(&mut self, ch: char) {
        match ch {
            'n' => {
                self.state.input = Some(InputState {
                    purpose: InputPurpose::NewCategory,
                    buffer: String::new(),
                });
            }
            'e' => {
                if let Some(category) = self.state.categories.selected_category() {
                    self.state.input = Some(InputState {
                        purpose: InputPurpose::RenameCategory {
                            id: category.id.clone(),
                        },
                        buffer: category.name.clone(),
                    });
                }
            }
            'd' => {
                if let Some(id) = self
                    .state
                    .categories
                    .selected_category()
                    .map(|category| category.id.clone())
                {
                    self.delete_selected_category(id).await;
                }
            }
            _ => {}
        }
    }

    async fn handle_budget_char(&mut self, ch: char) {
        match ch {
            'n' => {
                if self.state.budget.budget.is_none() {
                    self.state.budget.error =
                        Some("Nessun budget per questo mese: premi 'm' per crearlo.".to_string());
                    return;
                }
                self.state.input = Some(InputState {
                    purpose: InputPurpose::NewBudgetItem,
                    buffer: String::new(),
                });
            }
            'e' => {
                if let Some(item) = self.state.budget.selected_item() {
                    self.state.input = Some(InputState {
                        purpose: InputPurpose::EditItemAmount {
                            id: item.id.clone(),
                        },
                        buffer: format!("{}", item.amount),
                    });
                }
            }
            'd' => self.delete_selected_item().await,
            'm' => self.create_budget().await,
            'p' => self.copy_previous_month().await,
            _ => {}
        }
    }

    async fn submit_input(&mut self, input: InputState) {
        match input.purpose {
            InputPurpose::QuickAdd => self.quick_add(&input.buffer).await,
            InputPurpose::FilterText => {
                self.state.transactions.filters.text = input.buffer.trim().to_string();
                self.state.transactions.selected = 0;
            }
            InputPurpose::NewCategory => self.save_category(None, input.buffer).await,
            InputPurpose::RenameCategory { id } => self.save_category(Some(id), input.buffer).await,
            InputPurpose::NewBudgetItem => self.add_budget_item(&input.buffer).await,
            InputPurpose::EditItemAmount { id } => {
                self.update_item_amount(&id, &input.buffer).await
            }
        }
    }

    async fn quick_add(&mut self, buffer: &str) {
        let parsed = match quick_add::parse(buffer) {
            Ok(parsed) => parsed,
            Err(message) => {
                self.state.transactions.error = Some(message);
                return;
            }
        };

        let category = match self.resolve_category(parsed.category.as_deref()) {
            Ok(category) => category,
            Err(message) => {
                self.state.transactions.error = Some(message);
                return;
            }
        };
        let budget_item = match self.resolve_budget_item(parsed.budget_item.as_deref()) {
            Ok(item) => item,
            Err(message) => {
                self.state.transactions.error = Some(message);
                return;
            }
        };
        let Some(user) = self.state.user.as_ref() else {
            self.state.transactions.error = Some("Utente non inizializzato.".to_string());
            return;
        };

        let payload = TransactionNew {
            description: parsed.description,
            amount: parsed.amount.into(),
            date: default_date(self.state.period),
            budget_item,
            category,
            user: EntityRef::new(user.id.clone()),
        };

        match self.engine.add_transaction(payload).await {
            Ok(_) => self.load_transactions_screen().await,
            Err(err) => {
                tracing::error!("add transaction failed: {err}");
                self.state.transactions.error = Some(error_message(&err));
            }
        }
    }

    fn resolve_category(&self, name: Option<&str>) -> std::result::Result<Option<EntityRef>, String> {
        let Some(name) = name else { return Ok(None) };
        self.state
            .transactions
            .categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name))
            .map(|category| Some(EntityRef::new(category.id.clone())))
            .ok_or_else(|| format!("Categoria sconosciuta: {name}"))
    }

    fn resolve_budget_item(
        &self,
        name: Option<&str>,
    ) -> std::result::Result<Option<EntityRef>, String> {
        let Some(name) = name else { return Ok(None) };
        self.state
            .transactions
            .budget_items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
            .map(|item| Some(EntityRef::new(item.id.clone())))
            .ok_or_else(|| format!("Voce di budget sconosciuta: {name}"))
    }

    async fn save_category(&mut self, id: Option<String>, name: String) {
        let payload = CategorySave { id, name };
        match self.engine.save_category(payload).await {
            Ok(_) => self.load_categories().await,
            Err(err) => {
                tracing::error!("save category failed: {err}");
                self.state.categories.error = Some(error_message(&err));
            }
        }
    }

    async fn delete_selected_category(&mut self, id: String) {
        match self.engine.delete_category(&id).await {
            Ok(()) => self.load_categories().await,
            Err(err) => {
                // Deletes are destructive: block until the user has seen it.
                tracing::error!("delete category failed: {err}");
                self.state.notice = Some(
                    "Impossibile eliminare la categoria: probabilmente è in uso.".to_string(),
                );
            }
        }
    }

    async fn add_budget_item(&mut self, buffer: &str) {
        let Some(budget_id) = self.state.budget.budget.as_ref().map(|b| b.id.clone()) else {
            self.state.budget.error = Some("Nessun budget per questo mese.".to_string());
            return;
        };
        let (name, amount) = match parse_item_entry(buffer) {
            Ok(entry) => entry,
            Err(message) => {
                self.state.budget.error = Some(message);
                return;
            }
        };

        let payload = BudgetItemNew {
            budget_id: Some(budget_id),
            budget: None,
            name,
            amount: amount.into(),
        };
        match self.engine.add_budget_item(payload).await {
            Ok(_) => self.load_budget().await,
            Err(err) => {
                tracing::error!("add budget item failed: {err}");
                self.state.budget.error = Some(error_message(&err));
            }
        }
    }

    async fn update_item_amount(&mut self, id: &str, buffer: &str) {
        let amount = match parse_amount(buffer) {
            Ok(amount) => amount,
            Err(message) => {
                self.state.budget.error = Some(message);
                return;
            }
        };

        let payload = BudgetItemUpdate {
            name: None,
            amount: Some(amount.into()),
        };
        match self.engine.update_budget_item(id, payload).await {
            Ok(_) => self.load_budget().await,
            Err(err) => {
                tracing::error!("update budget item failed: {err}");
                self.state.budget.error = Some(error_message(&err));
            }
        }
    }

    async fn delete_selected_item(&mut self) {
        let Some(id) = self.state.budget.selected_item().map(|item| item.id.clone()) else {
            return;
        };
        match self.engine.remove_budget_item(&id).await {
            Ok(()) => self.load_budget().await,
            Err(err) => {
                tracing::error!("remove budget item failed: {err}");
                self.state.notice = Some("Impossibile eliminare la voce di budget.".to_string());
            }
        }
    }

    async fn create_budget(&mut self) {
        let payload = BudgetNew {
            month: self.state.period.month,
            year: self.state.period.year,
        };
        match self.engine.create_budget(payload).await {
            Ok(_) => self.load_budget().await,
            Err(err) => {
                tracing::error!("create budget failed: {err}");
                self.state.budget.error = Some(error_message(&err));
            }
        }
    }

    async fn copy_previous_month(&mut self) {
        match self.engine.copy_previous_month(self.state.period).await {
            Ok(_) => self.load_budget().await,
            Err(err) => {
                tracing::error!("copy previous month failed: {err}");
                self.state.budget.error = Some(error_message(&err));
            }
        }
    }

    async fn reload_section(&mut self) {
        match self.state.section {
            Section::Transactions => self.load_transactions_screen().await,
            Section::Categories => self.load_categories().await,
            Section::Budget => self.load_budget().await,
        }
    }

    /// The transactions screen needs all three lists; each mutation ends
    /// here, refetching rather than patching local copies.
    async fn load_transactions_screen(&mut self) {
        let period = self.state.period;
        self.state.transactions.error = None;

        match self.engine.transactions(Some(period)).await {
            Ok(items) => self.state.transactions.items = items,
            Err(err) => {
                tracing::error!("load transactions failed: {err}");
                self.state.transactions.items = Vec::new();
                self.state.transactions.error = Some(error_message(&err));
            }
        }

        match self.engine.budget_for_period(period).await {
            Ok(budget) => {
                self.state.transactions.budget_items =
                    budget.map(|budget| budget.budget_items).unwrap_or_default();
            }
            Err(err) => {
                tracing::error!("load budget items failed: {err}");
                self.state.transactions.budget_items = Vec::new();
                self.state.transactions.error = Some(error_message(&err));
            }
        }

        match self.engine.categories().await {
            Ok(categories) => self.state.transactions.categories = categories,
            Err(err) => {
                tracing::error!("load categories failed: {err}");
                self.state.transactions.categories = Vec::new();
                self.state.transactions.error = Some(error_message(&err));
            }
        }

        self.state.transactions.selected = 0;
    }

    async fn load_categories(&mut self) {
        match self.engine.categories().await {
            Ok(items) => {
                self.state.categories.items = items;
                self.state.categories.error = None;
            }
            Err(err) => {
                tracing::error!("load categories failed: {err}");
                self.state.categories.error = Some(error_message(&err));
            }
        }
        self.state.categories.selected = 0;
    }

    async fn load_budget(&mut self) {
        match self.engine.budget_for_period(self.state.period).await {
            Ok(budget) => {
                self.state.budget.budget = budget;
                self.state.budget.error = None;
            }
            Err(err) => {
                tracing::error!("load budget failed: {err}");
                self.state.budget.budget = None;
                self.state.budget.error = Some(error_message(&err));
            }
        }
        self.state.budget.selected = 0;
    }
}

/// Default date for a new transaction: today when the selected month is
/// the current one, otherwise the first day of that month.
fn default_date(period: Period) -> NaiveDate {
    let today = Local::now().date_naive();
    if Period::from_date(today) == period {
        today
    } else {
        NaiveDate::from_ymd_opt(period.year, period.month, 1).unwrap_or(today)
    }
}

/// Parses "name amount" for a new budget item; the amount is the last
/// token so names may contain spaces.
fn parse_item_entry(buffer: &str) -> std::result::Result<(String, f64), String> {
    let trimmed = buffer.trim();
    let Some((name, amount_raw)) = trimmed.rsplit_once(' ') else {
        return Err("Inserisci nome e importo.".to_string());
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("Nome mancante.".to_string());
    }
    let amount = parse_amount(amount_raw)?;
    Ok((name, amount))
}

fn parse_amount(raw: &str) -> std::result::Result<f64, String> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| "Importo non valido.".to_string())
}

fn error_message(err: &EngineError) -> String {
    match err {
        EngineError::KeyNotFound(_) => "Elemento non trovato.".to_string(),
        EngineError::ExistingKey(_) => "Esiste già.".to_string(),
        EngineError::CategoryInUse(_) => "Categoria in uso.".to_string(),
        EngineError::InvalidAmount(_) | EngineError::InvalidDate(_) | EngineError::InvalidName(_) => {
            format!("Dati non validi: {err}")
        }
        EngineError::Store(err) => format!("Errore dello store: {err}"),
    }
}
