//! FILENAME: xlsx-sink/src/format.rs
//! PURPOSE: Converts engine cell styles to rust_xlsxwriter formats.

use export_engine::{BorderStyle, CellStyle, HorizontalAlign, VerticalAlign};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline};

pub fn convert_style_to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if style.italic {
        format = format.set_italic();
    }
    if style.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if style.wrap_text {
        format = format.set_text_wrap();
    }

    format = format.set_font_size(style.font_size as f64);
    format = format.set_border(convert_border(style.border_style));
    format = format.set_align(convert_horizontal_align(style.horizontal_align));
    format = format.set_align(convert_vertical_align(style.vertical_align));

    if let Some(ref number_format) = style.number_format {
        format = format.set_num_format(number_format);
    }

    format
}

fn convert_border(border: BorderStyle) -> FormatBorder {
    match border {
        BorderStyle::None => FormatBorder::None,
        BorderStyle::Thin => FormatBorder::Thin,
        BorderStyle::Medium => FormatBorder::Medium,
        BorderStyle::Thick => FormatBorder::Thick,
    }
}

fn convert_horizontal_align(align: HorizontalAlign) -> FormatAlign {
    match align {
        HorizontalAlign::General => FormatAlign::General,
        HorizontalAlign::Left => FormatAlign::Left,
        HorizontalAlign::Center => FormatAlign::Center,
        HorizontalAlign::Right => FormatAlign::Right,
        HorizontalAlign::Justify => FormatAlign::Justify,
        HorizontalAlign::Fill => FormatAlign::Fill,
        HorizontalAlign::Distributed => FormatAlign::Distributed,
    }
}

fn convert_vertical_align(align: VerticalAlign) -> FormatAlign {
    match align {
        VerticalAlign::Top => FormatAlign::Top,
        VerticalAlign::Center => FormatAlign::VerticalCenter,
        VerticalAlign::Bottom => FormatAlign::Bottom,
        VerticalAlign::Justify => FormatAlign::VerticalJustify,
        VerticalAlign::Distributed => FormatAlign::VerticalDistributed,
    }
}
