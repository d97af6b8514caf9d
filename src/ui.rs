use anyhow::Result;
use car_warehouse::{Car, CarId, CarMakerCatalog, CarRecordStore, ModelChoice};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    CarMakers,
    Inventory,
    Views,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterType {
    None,
    AllCars,
    UpToAge(u32),
    PriceRange(u32, u32),
    ByMaker(String),
}

impl FilterType {
    fn label(&self) -> String {
        match self {
            FilterType::None | FilterType::AllCars => "ALL".to_string(),
            FilterType::UpToAge(age) => format!("age <= {}", age),
            FilterType::PriceRange(min, max) => format!("price {}-{}", min, max),
            FilterType::ByMaker(maker) => maker.clone(),
        }
    }
}

/// Quick views offered on the Views page, keyed 1-6
const QUICK_VIEWS: [(&str, FilterType); 6] = [
    ("All Cars", FilterType::AllCars),
    ("Up to 5 years old", FilterType::UpToAge(5)),
    ("Up to 10 years old", FilterType::UpToAge(10)),
    ("Budget (500 - 5000)", FilterType::PriceRange(500, 5_000)),
    ("Mid-range (5001 - 15000)", FilterType::PriceRange(5_001, 15_000)),
    ("Premium (15001 - 30000)", FilterType::PriceRange(15_001, 30_000)),
];

#[derive(Debug, Clone)]
pub struct FilterState {
    pub active_filter: FilterType,
    /// Message of the last filter that matched nothing
    pub empty_message: Option<String>,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::CarMakers => Page::Inventory,
            Page::Inventory => Page::Views,
            Page::Views => Page::CarMakers,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::CarMakers => Page::Views,
            Page::Inventory => Page::CarMakers,
            Page::Views => Page::Inventory,
        }
    }
}

pub struct App {
    pub store: CarRecordStore,
    pub makers: CarMakerCatalog,
    pub current_year: u32,
    pub filtered_cars: Vec<(CarId, Car)>,
    pub state: TableState,
    pub current_page: Page,
    pub makers_state: TableState,
    pub show_detail: bool,
    pub filter_state: FilterState,
}

impl App {
    pub fn new(store: CarRecordStore, makers: CarMakerCatalog, current_year: u32) -> Self {
        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }

        let mut makers_state = TableState::default();
        if !makers.is_empty() {
            makers_state.select(Some(0));
        }

        let filtered_cars = collect(&store);

        Self {
            store,
            makers,
            current_year,
            filtered_cars,
            state,
            current_page: Page::Inventory,
            makers_state,
            show_detail: false,
            filter_state: FilterState {
                active_filter: FilterType::None,
                empty_message: None,
            },
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_car(&self) -> Option<&Car> {
        self.state
            .selected()
            .and_then(|i| self.filtered_cars.get(i))
            .map(|(_, car)| car)
    }

    pub fn apply_filter(&mut self, filter: FilterType) {
        self.filter_state.active_filter = filter.clone();

        let result = match filter {
            FilterType::None | FilterType::AllCars => Ok(self.store.clone()),
            FilterType::UpToAge(age) => self.store.filter_by_age(age, self.current_year),
            FilterType::PriceRange(min, max) => self.store.filter_by_price_range(min, max),
            FilterType::ByMaker(ref maker) => {
                self.store.filter_by_maker_and_model(maker, &ModelChoice::Any)
            }
        };

        match result {
            Ok(found) => {
                self.filtered_cars = collect(&found);
                self.filter_state.empty_message = None;
            }
            Err(e) => {
                self.filtered_cars.clear();
                self.filter_state.empty_message = Some(e.to_string());
            }
        }

        // Reset selection to first item
        if !self.filtered_cars.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter(FilterType::None);
    }

    /// Filter the inventory by the maker highlighted on the Car Makers page
    pub fn select_highlighted_maker(&mut self) {
        let maker = self
            .makers_state
            .selected()
            .and_then(|i| self.makers.get_by_ordinal(i + 1).ok())
            .map(|m| m.name().to_string());
        if let Some(maker) = maker {
            self.apply_filter(FilterType::ByMaker(maker));
            self.current_page = Page::Inventory;
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// Per catalog maker: name, model count, cars in stock, average price
    pub fn maker_summary(&self) -> Vec<(String, usize, usize, f64)> {
        self.makers
            .iter()
            .map(|maker| {
                let (count, total) = match self
                    .store
                    .filter_by_maker_and_model(maker.name(), &ModelChoice::Any)
                {
                    Ok(found) => (found.len(), found.cars().map(|c| c.price() as u64).sum::<u64>()),
                    Err(_) => (0, 0),
                };
                let avg = if count > 0 { total as f64 / count as f64 } else { 0.0 };
                (maker.name().to_string(), maker.model_count(), count, avg)
            })
            .collect()
    }

    pub fn next(&mut self) {
        let (len, state) = self.active_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (len, state) = self.active_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let (len, state) = self.active_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let (_, state) = self.active_table();
        let i = match state.selected() {
            Some(i) => i.saturating_sub(20),
            None => 0,
        };
        state.select(Some(i));
    }

    /// Row count and selection of the table on the current page
    fn active_table(&mut self) -> (usize, &mut TableState) {
        match self.current_page {
            Page::CarMakers => (self.makers.len(), &mut self.makers_state),
            _ => (self.filtered_cars.len(), &mut self.state),
        }
    }

    pub fn stats(&self) -> InventoryStats {
        let mut stats = InventoryStats::default();

        for car in self.store.cars() {
            stats.total_count += 1;
            stats.total_value += car.price() as u64;
            if car.age(self.current_year) <= 5 {
                stats.recent_count += 1;
            }
        }

        stats
    }
}

fn collect(store: &CarRecordStore) -> Vec<(CarId, Car)> {
    store.iter().map(|(id, car)| (id, car.clone())).collect()
}

#[derive(Default)]
pub struct InventoryStats {
    pub total_count: usize,
    pub total_value: u64,
    pub recent_count: usize,
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("Terminal browser failed: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter if app.current_page == Page::CarMakers => {
                    app.select_highlighted_maker()
                }
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('c') => {
                    app.clear_filter();
                    app.current_page = Page::Inventory;
                }
                KeyCode::Char(c @ '1'..='6') if app.current_page == Page::Views => {
                    let index = c as usize - '1' as usize;
                    app.apply_filter(QUICK_VIEWS[index].1.clone());
                    app.current_page = Page::Inventory;
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.active_table().1.select(Some(0)),
                KeyCode::End => {
                    let (len, state) = app.active_table();
                    if len > 0 {
                        state.select(Some(len - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::Inventory {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Car list
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::CarMakers => render_maker_summary(f, chunks[1], app),
            Page::Inventory => render_table(f, chunks[1], app),
            Page::Views => render_views(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.stats();

    let pages = [
        (Page::CarMakers, "Car Makers"),
        (Page::Inventory, "Inventory"),
        (Page::Views, "Views"),
    ];

    let mut tab_spans = vec![];
    for (i, (page, name)) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(*name, style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Cars: {}", stats.total_count),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Stock value: {}", stats.total_value),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("≤5y: {}", stats.recent_count),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn price_color(price: u32) -> Color {
    match price {
        0..=5_000 => Color::Green,
        5_001..=15_000 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Registration", "Year", "Colours", "Maker", "Model", "Price"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered_cars.iter().map(|(_, car)| {
        let cells = vec![
            Cell::from(car.registration_number().to_string()),
            Cell::from(car.year_made().to_string()),
            Cell::from(truncate(&car.colours().to_string(), 24)),
            Cell::from(truncate(car.car_maker(), 18)),
            Cell::from(truncate(car.car_model(), 18)),
            Cell::from(car.price().to_string()).style(Style::default().fg(price_color(car.price()))),
        ];

        Row::new(cells).height(1)
    });

    let title = match &app.filter_state.empty_message {
        Some(message) => format!(" Cars - {} ", message),
        None => " Cars ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Length(26),
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered_cars.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if app.filter_state.active_filter != FilterType::None
        && app.filter_state.active_filter != FilterType::AllCars
    {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", app.filter_state.active_filter.label()),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details/Select | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn render_maker_summary(f: &mut Frame, area: Rect, app: &mut App) {
    let summary = app.maker_summary();

    let header_cells = ["#", "Car Maker", "Models", "In Stock", "Avg Price"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = summary
        .iter()
        .enumerate()
        .map(|(i, (maker, models, in_stock, avg))| {
            let color = if *in_stock > 0 { Color::Green } else { Color::DarkGray };

            let cells = vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(maker.clone()),
                Cell::from(format!("{}", models)),
                Cell::from(format!("{}", in_stock)).style(Style::default().fg(color)),
                Cell::from(format!("{:.0}", avg)),
            ];

            Row::new(cells).height(1)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(25),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Car Makers - Enter to show their cars "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.makers_state);
}

fn render_views(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Quick Views & Filters",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];

    for (i, (name, filter)) in QUICK_VIEWS.iter().enumerate() {
        let marker = if app.filter_state.active_filter == *filter {
            Span::styled("→", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(" ")
        };
        content.push(Line::from(vec![
            Span::raw("  "),
            marker,
            Span::styled(format!("{}", i + 1), Style::default().fg(Color::Yellow)),
            Span::raw(format!(". {}", name)),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            "  Hint: ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ),
        Span::styled(
            "Press 1-6 to filter, c to clear, Enter on Car Makers to pick a maker",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Views - Quick Access Filters "),
    );

    f.render_widget(paragraph, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let car = match app.selected_car() {
        Some(c) => c,
        None => {
            let no_selection = Paragraph::new("No car selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Car Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let fields = [
        ("Registration Number", car.registration_number().to_string()),
        ("Year Made", car.year_made().to_string()),
        ("Age", format!("{} year(s)", car.age(app.current_year))),
        ("Colour", car.colours().to_string()),
        ("Car Maker", car.car_maker().to_string()),
        ("Car Model", car.car_model().to_string()),
        ("Price", car.price().to_string()),
    ];

    let mut content = vec![Line::from("")];
    for (name, value) in fields {
        content.push(Line::from(vec![
            Span::styled(format!("  {}: ", name), label),
            Span::raw(value),
        ]));
        content.push(Line::from(""));
    }
    content.push(Line::from(vec![Span::styled(
        "  Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )]));

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Car Details "),
    );

    f.render_widget(detail_panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut store = CarRecordStore::new();
        for line in [
            "AB12CD,2015,Red,,,Toyota,Corolla,8000",
            "XY34ZW,2019,Blue,,,Toyota,Yaris,12000",
            "HND001,2005,Black,,,Honda,Civic,3000",
        ] {
            store.add(CarRecordStore::deserialize_line(line).unwrap());
        }
        let mut makers = CarMakerCatalog::new();
        makers.add_maker("Toyota", vec!["Corolla".to_string(), "Yaris".to_string()]);
        makers.add_maker("Honda", vec!["Civic".to_string()]);
        makers.add_maker("Mazda", vec!["3".to_string()]);
        App::new(store, makers, 2021)
    }

    #[test]
    fn test_apply_filter_and_clear() {
        let mut app = create_test_app();
        app.apply_filter(FilterType::PriceRange(500, 5_000));
        assert_eq!(app.filtered_cars.len(), 1);
        assert_eq!(app.selected_car().unwrap().registration_number(), "HND001");

        app.clear_filter();
        assert_eq!(app.filtered_cars.len(), 3);
    }

    #[test]
    fn test_empty_filter_keeps_message() {
        let mut app = create_test_app();
        app.apply_filter(FilterType::PriceRange(15_001, 30_000));
        assert!(app.filtered_cars.is_empty());
        assert!(app.selected_car().is_none());
        assert!(app.filter_state.empty_message.is_some());
    }

    #[test]
    fn test_maker_summary_and_selection() {
        let mut app = create_test_app();
        let summary = app.maker_summary();
        assert_eq!(summary[0].2, 2);
        assert_eq!(summary[0].3, 10_000.0);
        assert_eq!(summary[2].2, 0);

        app.current_page = Page::CarMakers;
        app.next();
        app.select_highlighted_maker();
        assert_eq!(app.current_page, Page::Inventory);
        assert_eq!(app.filter_state.active_filter, FilterType::ByMaker("Honda".to_string()));
        assert_eq!(app.filtered_cars.len(), 1);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = create_test_app();
        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }
}
