//! Receipt

use std::{fmt::Write, io};

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::Language,
    items::CartLineItem,
    money::format_amount,
    pricing::TotalPriceError,
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating line or cart totals.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Terminal receipt for a cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Sum of quantities
    item_count: u64,

    /// Cart total
    total: Money<'a, Currency>,

    /// Language for product and customization names
    language: Language,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart total cannot be calculated.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, ReceiptError> {
        Ok(Self {
            item_count: cart.item_count(),
            total: cart.total()?,
            language: Language::default(),
        })
    }

    /// Render names in the given language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sum of quantities at the time the receipt was built.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Cart total at the time the receipt was built.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total cannot be calculated or the output
    /// cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, cart: &Cart<'_>) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "Item",
            "Size",
            "Customizations",
            "Qty",
            "Unit Price",
            "Line Total",
        ]);

        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = SmallVec::new();

        for (idx, item) in cart.iter().enumerate() {
            let row = idx + 1;

            builder.push_record(item_cells(idx, item, self.language)?);

            color_ops.push((row, 2, color_dark_grey()));
            color_ops.push((row, 3, color_dark_grey()));
        }

        write_receipt_table(&mut out, builder, cart.len(), color_ops)?;

        write_receipt_summary(&mut out, self)
    }
}

fn item_cells(
    idx: usize,
    item: &CartLineItem<'_>,
    language: Language,
) -> Result<[String; 7], ReceiptError> {
    let customizations = item
        .customizations()
        .iter()
        .map(|option| {
            format!(
                "{} (+{})",
                option.name.get(language),
                format_amount(&option.price)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok([
        format!("#{:<3}", idx + 1),
        item.name().get(language).to_string(),
        item.size().to_string(),
        customizations,
        item.quantity().to_string(),
        format_amount(&item.unit_total()?),
        format_amount(&item.line_total()?),
    ])
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    rows: usize,
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for row in 2..=rows {
        theme.insert_horizontal_line(row, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let items_label = " Items:";
    let total_label = " \x1b[1mTotal:\x1b[0m";

    let items_val = format!("{}  ", receipt.item_count());
    let total_val = format!("{}  ", format_amount(&receipt.total()));

    let label_width = visible_width(items_label).max(visible_width(total_label));
    let value_width = visible_width(&items_val).max(visible_width(&total_val));

    write_summary_line(out, items_label, &items_val, label_width, value_width)?;

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in ANSI dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
