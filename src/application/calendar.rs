use crate::application::{
    CalendarOptions, DayContext, DisableRules, FooterView, HeaderView, LayoutMetrics, MonthGrid,
    MonthLabel, Regions, RenderedCalendar, SummaryView, Target, apply_selection, locale,
};
use crate::entities::{
    Availability, CalendarEvent, DateRange, LegendItem, Locale, Selection, SelectionMode,
    SelectionState, YearMonth,
};
use crate::error::CalendarError;
use crate::infrastructure::{
    CalendarListener, HolidayCache, HolidayLanguage, ListenerRegistry, provider_for,
};
use chrono::{Local, NaiveDate};
use ratatui::layout::Rect;

/// Most months a calendar can show side by side.
pub const MAX_SHOWN_MONTHS: u8 = 2;

/// Date-picker component: owns configuration, view and selection state and
/// rebuilds its [`RenderedCalendar`] after every change.
pub struct Calendar {
    container: Rect,
    locale: Locale,
    start_week_on: u32,
    mode: SelectionMode,
    rules: DisableRules,
    has_info: bool,
    shown_months: u8,
    availability: Option<Availability>,
    holidays: Option<HolidayCache>,
    primary_legends: Vec<LegendItem>,
    secondary_legends: Vec<LegendItem>,
    month_label: Option<MonthLabel>,
    /// Fixed "today"; follows the local clock when unset.
    pinned_today: Option<NaiveDate>,

    // view state
    view_month: YearMonth,

    // selection state
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    hover: Option<NaiveDate>,

    listeners: ListenerRegistry,
    view: RenderedCalendar,
}

impl Calendar {
    pub fn new(options: CalendarOptions, regions: &Regions) -> Result<Self, CalendarError> {
        let target = options.target.ok_or(CalendarError::MissingTarget)?;
        if let Some(months) = options.shown_months.filter(|m| *m > MAX_SHOWN_MONTHS) {
            return Err(CalendarError::TooManyMonths(months));
        }
        let container = match target {
            Target::Area(area) => area,
            Target::Selector(selector) => regions
                .resolve(&selector)
                .ok_or(CalendarError::TargetNotFound(selector))?,
        };

        let today = options.today.unwrap_or_else(|| Local::now().date_naive());
        let locale = options.locale.unwrap_or_default();
        let shown_months = options.shown_months.unwrap_or(1).max(1);

        let holidays = if options.enable_holidays {
            let provider = match options.holiday_provider {
                Some(provider) => provider,
                None => provider_for(
                    options.holiday_country.unwrap_or_default(),
                    options
                        .holiday_language
                        .unwrap_or_else(|| HolidayLanguage::for_locale(locale)),
                ),
            };
            Some(HolidayCache::new(provider))
        } else {
            None
        };

        let mut calendar = Self {
            container,
            locale,
            start_week_on: options.start_week_on.unwrap_or(0).clamp(0, 6) as u32,
            mode: options.selection_mode.unwrap_or_default(),
            rules: DisableRules {
                min_date: Some(options.min_date.unwrap_or(today)),
                max_date: options.max_date,
                predicate: options.is_date_disabled,
            },
            has_info: options.has_info,
            shown_months,
            availability: options.availability,
            holidays,
            primary_legends: options.primary_legends,
            secondary_legends: options.secondary_legends,
            month_label: options.month_label,
            pinned_today: options.today,
            view_month: YearMonth::of(options.initial_date.unwrap_or(today)),
            start: None,
            end: None,
            hover: None,
            listeners: ListenerRegistry::new(),
            view: RenderedCalendar {
                header: HeaderView {
                    summary: None,
                    show_prev: false,
                    titles: Vec::new(),
                },
                months: Vec::new(),
                footer: FooterView::default(),
                metrics: LayoutMetrics::for_months(shown_months),
            },
        };

        log::debug!(
            "calendar mounted at {:?}: locale={} mode={:?} months={} holidays={}",
            calendar.container,
            calendar.locale,
            calendar.mode,
            calendar.shown_months,
            calendar
                .holidays
                .as_ref()
                .map(HolidayCache::provider_name)
                .unwrap_or("off")
        );

        calendar.render(false);
        Ok(calendar)
    }

    /// Register a listener for month-change and selection notifications.
    pub fn listen<L>(&mut self, listener: L)
    where
        L: CalendarListener + 'static,
    {
        self.listeners.register(listener);
    }

    // ---------- Navigation ----------

    pub fn goto(&mut self, date: NaiveDate) {
        self.view_month = YearMonth::of(date);
        self.render(true);
    }

    pub fn next_month(&mut self) {
        self.view_month = self.view_month.next();
        self.render(true);
    }

    pub fn prev_month(&mut self) {
        self.view_month = self.view_month.prev();
        self.render(true);
    }

    // ---------- Legends ----------

    pub fn set_primary_legends(&mut self, legends: Vec<LegendItem>) {
        self.primary_legends = legends;
        self.render(false);
    }

    pub fn set_secondary_legends(&mut self, legends: Vec<LegendItem>) {
        self.secondary_legends = legends;
        self.render(false);
    }

    // ---------- Selection ----------

    pub fn clear_selection(&mut self) {
        self.start = None;
        self.end = None;
        self.hover = None;
        self.render(false);
    }

    pub fn selection(&self) -> Selection {
        Selection::new(self.start, self.end)
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection().state(self.mode)
    }

    /// Pick a date, as a click on its day cell would. Returns `false` when the
    /// date is disabled and nothing changed.
    pub fn select(&mut self, date: NaiveDate) -> bool {
        if self.is_disabled(date) {
            log::debug!("ignoring pick of disabled date {}", date);
            return false;
        }

        if self.mode.is_single() {
            self.start = Some(date);
            self.end = None;
            self.dispatch(CalendarEvent::DateSelect { date });
            self.render(false);
            return true;
        }

        match self.selection_state() {
            SelectionState::StartOnly => {
                let range = DateRange::between(self.start.unwrap_or(date), date);
                self.start = Some(range.start);
                self.end = Some(range.end);
                self.dispatch(CalendarEvent::RangeComplete {
                    start: range.start,
                    end: range.end,
                    nights: range.nights(),
                });
            }
            _ => {
                self.start = Some(date);
                self.end = None;
                self.hover = None;
                self.dispatch(CalendarEvent::RangeStart { start: date });
            }
        }
        self.render(false);
        true
    }

    /// Pointer entered a day cell. Disabled days are ignored.
    pub fn hover(&mut self, date: NaiveDate) {
        if self.is_disabled(date) || self.hover == Some(date) {
            return;
        }
        self.hover = Some(date);
        self.render(false);
    }

    /// Pointer left the month grids.
    pub fn leave(&mut self) {
        if self.hover.take().is_some() {
            self.render(false);
        }
    }

    pub fn hover_date(&self) -> Option<NaiveDate> {
        self.hover
    }

    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        self.rules.is_disabled(date)
    }

    // ---------- Accessors ----------

    pub fn view(&self) -> &RenderedCalendar {
        &self.view
    }

    pub fn displayed_month(&self) -> YearMonth {
        self.view_month
    }

    /// Every month currently on screen.
    pub fn displayed_range(&self) -> DateRange {
        DateRange {
            start: self.view_month.first_day(),
            end: self
                .view_month
                .add_months(self.shown_months as i32 - 1)
                .last_day(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    pub fn set_container(&mut self, area: Rect) {
        self.container = area;
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.view.metrics
    }

    // ---------- Rendering ----------

    fn dispatch(&self, event: CalendarEvent) {
        log::debug!("{:?}", event);
        self.listeners.dispatch(&event);
    }

    fn month_title(&self, year_month: YearMonth) -> String {
        match &self.month_label {
            Some(label) => label(year_month.first_day()),
            None => locale::month_title(self.locale, year_month),
        }
    }

    fn render_header(&self, today: NaiveDate) -> HeaderView {
        let summary = self.has_info.then(|| {
            let selection = self.selection();
            match self.mode {
                SelectionMode::Range => SummaryView::range(&selection),
                SelectionMode::Single | SelectionMode::Multiple => SummaryView::single(&selection),
            }
        });

        HeaderView {
            summary,
            show_prev: self.view_month != YearMonth::of(today),
            titles: (0..self.shown_months)
                .map(|i| self.month_title(self.view_month.add_months(i as i32)))
                .collect(),
        }
    }

    fn render_months(&mut self, today: NaiveDate) -> Vec<MonthGrid> {
        let weekdays = locale::weekday_headers(self.locale, self.start_week_on);
        let titles: Vec<(YearMonth, String)> = (0..self.shown_months)
            .map(|i| {
                let year_month = self.view_month.add_months(i as i32);
                (year_month, self.month_title(year_month))
            })
            .collect();

        let mut ctx = DayContext {
            rules: &self.rules,
            today,
            availability: self.availability.as_ref(),
            holidays: self.holidays.as_mut(),
        };
        let mut months: Vec<MonthGrid> = titles
            .into_iter()
            .map(|(year_month, title)| {
                MonthGrid::build(year_month, self.start_week_on, title, weekdays.clone(), &mut ctx)
            })
            .collect();

        let hover = match self.selection_state() {
            SelectionState::StartOnly => self.hover,
            _ => None,
        };
        apply_selection(&mut months, self.start, self.end, hover);
        months
    }

    fn render_footer(&self) -> FooterView {
        FooterView {
            primary: self.primary_legends.clone(),
            secondary: self.secondary_legends.clone(),
        }
    }

    /// Rebuild the whole view; announce the displayed month when `emit_change`.
    fn render(&mut self, emit_change: bool) {
        let today = self.today();
        let header = self.render_header(today);
        let months = self.render_months(today);
        let footer = self.render_footer();

        self.view = RenderedCalendar {
            header,
            months,
            footer,
            metrics: LayoutMetrics::for_months(self.shown_months),
        };

        if emit_change {
            self.dispatch(CalendarEvent::MonthChange {
                year: self.view_month.year,
                month: self.view_month.month,
            });
        }
    }
}
