use std::ops::Range;

use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};

/// Render a table with a bold header and `numeric` columns right-aligned.
pub(crate) fn render(builder: Builder, numeric: Range<usize>) -> Table {
    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    table
}
