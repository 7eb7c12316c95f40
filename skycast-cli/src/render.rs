use chrono::NaiveTime;
use skycast_core::{
    CurrentConditions, CurrentReport, Direction, Forecast, Location, Phase, TemperatureBand, Theme,
    Unit, ViewState, format_temperature, visible_hours,
};
use std::fmt::{self, Write};

/// Which parts of the view to draw. Every variant renders the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub show_days: bool,
    pub show_hours: bool,
    pub color: bool,
}

impl ViewConfig {
    pub fn full() -> Self {
        Self { show_days: true, show_hours: true, color: true }
    }

    /// Current conditions only.
    pub fn compact() -> Self {
        Self { show_days: false, show_hours: false, color: true }
    }

    pub fn plain(self) -> Self {
        Self { color: false, ..self }
    }
}

struct Palette {
    color: bool,
    heading: &'static str,
}

impl Palette {
    fn new(theme: Theme, color: bool) -> Self {
        let heading = match theme {
            Theme::Light => "1;30",
            Theme::Dark => "1;97",
        };
        Self { color, heading }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint(self.heading, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn band(&self, band: TemperatureBand, text: &str) -> String {
        let code = match band {
            TemperatureBand::Freezing => "1;34",
            TemperatureBand::Cold => "34",
            TemperatureBand::Mild => "32",
            TemperatureBand::Warm => "33",
            TemperatureBand::Hot => "31",
        };
        self.paint(code, text)
    }
}

pub fn render(state: &ViewState, view: ViewConfig) -> String {
    StateView { state, view }.to_string()
}

/// Output for the current-only lookup.
pub fn render_report(report: &CurrentReport, unit: Unit, theme: Theme, color: bool) -> String {
    ReportView { report, unit, palette: Palette::new(theme, color) }.to_string()
}

struct StateView<'a> {
    state: &'a ViewState,
    view: ViewConfig,
}

impl fmt::Display for StateView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        let palette = Palette::new(state.theme(), self.view.color);

        match state.phase() {
            Phase::Loading { query } => {
                let target = query.as_ref().map(|q| format!(" for {q}")).unwrap_or_default();
                return writeln!(out, "{}", palette.dim(&format!("Loading{target}...")));
            }
            Phase::Failed { notice } => {
                writeln!(out, "{}", palette.paint("31", &format!("! {notice}")))?;
            }
            Phase::Idle | Phase::Success => {}
        }

        let Some(forecast) = state.forecast() else {
            return writeln!(out, "No weather data available. Enter a location to get started.");
        };

        write_location(out, &palette, &forecast.location)?;
        if let Some(today) = forecast.days.first() {
            let date = today.date.format("%A, %B %-d, %Y").to_string();
            writeln!(out, "{}", palette.dim(&date))?;
        }
        write_current(out, &palette, &forecast.current, state.unit())?;

        if self.view.show_days {
            write_days(out, &palette, forecast, state)?;
        }
        if self.view.show_hours {
            write_hours(out, state)?;
        }
        Ok(())
    }
}

struct ReportView<'a> {
    report: &'a CurrentReport,
    unit: Unit,
    palette: Palette,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_location(out, &self.palette, &self.report.location)?;
        write_current(out, &self.palette, &self.report.current, self.unit)
    }
}

fn write_location(out: &mut impl Write, palette: &Palette, location: &Location) -> fmt::Result {
    let place = [location.name.as_str(), location.region.as_str(), location.country.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "{}", palette.heading(&place))
}

fn write_current(
    out: &mut impl Write,
    palette: &Palette,
    current: &CurrentConditions,
    unit: Unit,
) -> fmt::Result {
    let band = TemperatureBand::from_celsius(current.temperature_c);
    let temperature = format_temperature(current.temperature_c, unit);
    let daytime = if current.is_day { "day" } else { "night" };

    writeln!(
        out,
        "{}  {} ({daytime})",
        palette.band(band, &temperature),
        current.condition.text
    )?;
    writeln!(
        out,
        "Feels like {}  |  Humidity {}%  |  Wind {} km/h",
        format_temperature(current.feels_like_c, unit),
        current.humidity_pct,
        current.wind_kph
    )?;
    writeln!(out, "{}", palette.dim(&current.condition.icon_url()))
}

fn write_days(
    out: &mut impl Write,
    palette: &Palette,
    forecast: &Forecast,
    state: &ViewState,
) -> fmt::Result {
    let unit = state.unit();
    let strip = forecast
        .days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let label = day.date.format("%a %d").to_string();
            if i == state.selected_index() { format!("[{label}]") } else { format!(" {label} ") }
        })
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out)?;
    writeln!(out, "{strip}")?;

    let Some(day) = state.selected_day() else {
        return Ok(());
    };
    writeln!(
        out,
        "{}  {}  {} / {}  rain {}%",
        palette.heading(&day.date.format("%A %-d %B").to_string()),
        day.condition.text,
        format_temperature(day.min_temp_c, unit),
        format_temperature(day.max_temp_c, unit),
        day.chance_of_rain_pct
    )?;
    writeln!(
        out,
        "Sunrise {}  Sunset {}",
        astro(day.sunrise, "no sunrise"),
        astro(day.sunset, "no sunset")
    )?;

    let prev = if state.can_step(Direction::Prev) { "< :prev" } else { "" };
    let next = if state.can_step(Direction::Next) { ":next >" } else { "" };
    if !prev.is_empty() || !next.is_empty() {
        writeln!(out, "{}", palette.dim(format!("{prev}   {next}").trim()))?;
    }
    Ok(())
}

fn write_hours(out: &mut impl Write, state: &ViewState) -> fmt::Result {
    let Some(day) = state.selected_day() else {
        return Ok(());
    };
    writeln!(out)?;
    for hour in visible_hours(day) {
        writeln!(
            out,
            "{}  {:>5}  rain {:>3}%  {}",
            hour.time.format("%H:%M"),
            format_temperature(hour.temperature_c, state.unit()),
            hour.chance_of_rain_pct,
            hour.condition.text
        )?;
    }
    Ok(())
}

fn astro(time: Option<NaiveTime>, missing: &str) -> String {
    time.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| missing.to_string())
}
