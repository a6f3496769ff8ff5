use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    chart::{ChartId, ChartOptions},
    core::badge::{MISSING, STALE},
    dashboard::{BadgeSlot, Section},
    i18n::Translator,
};

fn new_table(translator: &Translator, header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(header.iter().map(|key| translator.lazy(key)));
    table
}

pub fn build_badges_table(slots: &[BadgeSlot], translator: &Translator) -> Table {
    let mut table = new_table(translator, &["Icon", "Channel", "Value", "Unit", "Date", "Time"]);
    for slot in slots {
        match &slot.section {
            Section::Ready(view) => {
                let value = Cell::new(&view.value).set_alignment(CellAlignment::Right);
                let value = match view.value.as_str() {
                    MISSING => value.fg(Color::DarkYellow),
                    STALE => value.add_attribute(Attribute::Dim),
                    _ => value.add_attribute(Attribute::Bold),
                };
                table.add_row(vec![
                    Cell::new(&view.icon).add_attribute(Attribute::Dim),
                    Cell::new(&view.name),
                    value,
                    Cell::new(&view.unit),
                    Cell::new(&view.date).add_attribute(Attribute::Dim),
                    Cell::new(&view.time),
                ]);
            }
            Section::Unavailable(reason) => {
                table.add_row(vec![
                    Cell::new(&slot.badge.icon).add_attribute(Attribute::Dim),
                    Cell::new(&slot.badge.guid),
                    Cell::new(reason).fg(Color::Red),
                ]);
            }
        }
    }
    table
}

/// Summary of the chart series: one row per series.
pub fn build_charts_table(
    charts: &[(ChartId, Section<ChartOptions>)],
    translator: &Translator,
) -> Table {
    let mut table = new_table(translator, &["Chart", "Series", "Points", "Last", "Unit"]);
    for (id, section) in charts {
        match section {
            Section::Ready(options) => {
                for series in &options.series {
                    table.add_row(vec![
                        Cell::new(id).add_attribute(Attribute::Dim),
                        Cell::new(&series.name).fg(Color::Cyan),
                        Cell::new(series.data.len()).set_alignment(CellAlignment::Right),
                        Cell::new(
                            series
                                .data
                                .last_value()
                                .map_or_else(|| MISSING.to_owned(), |value| value.to_string()),
                        )
                        .set_alignment(CellAlignment::Right),
                        Cell::new(&options.y_axis.title.text),
                    ]);
                }
            }
            Section::Unavailable(reason) => {
                table.add_row(vec![
                    Cell::new(id).add_attribute(Attribute::Dim),
                    Cell::new(reason).fg(Color::Red),
                ]);
            }
        }
    }
    table
}
