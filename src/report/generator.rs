//! DOCX rendering of a [`ComplianceResult`].
//!
//! Sections are built as independent block lists and folded into one
//! document, in order: cover, management summary, one section per category,
//! sub-processors, recommendations, sources, disclaimer, footer.

use chrono::NaiveDateTime;
use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    NumberFormat, Numbering, NumberingId, Paragraph, Run, RunFonts, Shading, SpecialIndentType,
    Start, Style, StyleType, Table, TableCell, TableRow,
};
use std::io::Cursor;

use super::content::*;
use crate::types::{
    CategoryResult, CheckerError, ComplianceResult, Result, Source, SubProcessor, TrafficLight,
};

const BULLET_NUMBERING: usize = 1;

// Sizes are half-points
const SIZE_BODY: usize = 20;
const SIZE_SMALL: usize = 18;

// Indents are twips
const INDENT_FINDING: i32 = 283;
const INDENT_SOURCE: i32 = 567;

enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl From<Table> for Block {
    fn from(t: Table) -> Self {
        Block::Table(t)
    }
}

/// Render `result` into DOCX bytes, stamped with `generated_at`
pub fn render(result: &ComplianceResult, generated_at: NaiveDateTime) -> Result<Vec<u8>> {
    let blocks = cover(result, generated_at)
        .into_iter()
        .chain(management_summary(result))
        .chain(result.categories.iter().flat_map(category_section))
        .chain(sub_processor_section(result))
        .chain(recommendation_section(result.overall_status))
        .chain(sources_section(&result.sources_consulted))
        .chain(disclaimer_section(&result.disclaimer))
        .chain(footer());

    let docx = blocks.fold(base_document(), |doc, block| match block {
        Block::Paragraph(p) => doc.add_paragraph(p),
        Block::Table(t) => doc.add_table(t),
    });

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| CheckerError::Report(e.to_string()))?;

    Ok(buffer.into_inner())
}

fn base_document() -> Docx {
    Docx::new()
        .default_fonts(RunFonts::new().ascii("Calibri").hi_ansi("Calibri"))
        .default_size(SIZE_BODY)
        .add_style(
            Style::new("Heading1", StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold()
                .color(BRAND_BLUE),
        )
        .add_style(
            Style::new("Heading2", StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold()
                .color(BRAND_LIGHT_BLUE),
        )
        .add_abstract_numbering(
            AbstractNumbering::new(BULLET_NUMBERING).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("bullet"),
                    LevelText::new("•"),
                    LevelJc::new("left"),
                )
                .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
            ),
        )
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
}

fn text(value: impl Into<String>) -> Run {
    Run::new().add_text(value)
}

fn heading(level: u8, value: &str) -> Paragraph {
    let style = if level == 1 { "Heading1" } else { "Heading2" };
    Paragraph::new().style(style).add_run(text(value))
}

fn blank() -> Paragraph {
    Paragraph::new()
}

fn bullet(runs: Vec<Run>) -> Paragraph {
    runs.into_iter().fold(
        Paragraph::new().numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
        |p, run| p.add_run(run),
    )
}

fn status_run(status: TrafficLight) -> Run {
    text(status_label(status)).bold().color(status_color(status))
}

fn cell(run: Run) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}

fn header_row(titles: &[&str]) -> TableRow {
    TableRow::new(
        titles
            .iter()
            .map(|title| {
                cell(text(*title).bold().color("FFFFFF"))
                    .shading(Shading::new().fill(BRAND_BLUE))
            })
            .collect(),
    )
}

fn cover(result: &ComplianceResult, generated_at: NaiveDateTime) -> Vec<Block> {
    let status = result.overall_status;
    let mut blocks: Vec<Block> = (0..6).map(|_| blank().into()).collect();

    blocks.push(
        Paragraph::new()
            .add_run(text("&samhoud  |  ToolChecker").size(22).color(BRAND_BLUE))
            .into(),
    );
    blocks.push(
        Paragraph::new()
            .add_run(text("AVG/GDPR Compliance Rapport").size(56).bold().color(BRAND_BLUE))
            .into(),
    );
    blocks.push(
        Paragraph::new()
            .add_run(text(result.tool_name.as_str()).size(44).color(COLOR_DARK))
            .into(),
    );
    blocks.push(
        Paragraph::new()
            .add_run(
                text(format!("[{}]  ", status_marker(status)))
                    .size(36)
                    .bold()
                    .color(status_color(status)),
            )
            .add_run(status_run(status).size(28))
            .into(),
    );
    blocks.extend((0..4).map(|_| blank().into()));
    blocks.push(
        Paragraph::new()
            .add_run(
                text(format!("Gegenereerd op {}", format_generated_at(generated_at)))
                    .size(SIZE_SMALL)
                    .color(COLOR_GRAY),
            )
            .add_run(
                Run::new()
                    .add_break(BreakType::TextWrapping)
                    .add_text("Door ToolChecker by &samhoud")
                    .size(SIZE_SMALL)
                    .color(COLOR_GRAY),
            )
            .into(),
    );

    if let Some(url) = result.tool_url.as_deref().filter(|u| !u.is_empty()) {
        blocks.push(
            Paragraph::new()
                .add_run(text(url).size(SIZE_SMALL).color(BRAND_BLUE_SOFT))
                .into(),
        );
    }

    blocks.push(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)).into());
    blocks
}

fn management_summary(result: &ComplianceResult) -> Vec<Block> {
    let mut blocks: Vec<Block> = vec![
        heading(1, "Managementsamenvatting").into(),
        Paragraph::new()
            .add_run(text(summary_intro(&result.tool_name)))
            .into(),
        Paragraph::new().add_run(text(result.summary.as_str())).into(),
    ];

    if !result.categories.is_empty() {
        let rows = std::iter::once(header_row(&["Categorie", "Beoordeling"]))
            .chain(result.categories.iter().map(|category| {
                TableRow::new(vec![
                    cell(text(category.name.as_str())),
                    cell(status_run(category.status)),
                ])
            }))
            .collect();
        blocks.push(Table::new(rows).into());
    }

    blocks.push(blank().into());
    blocks.push(
        Paragraph::new()
            .add_run(text("Stoplicht betekenis:").bold())
            .into(),
    );
    blocks.extend(LEGEND.iter().map(|(status, label, meaning)| {
        bullet(vec![
            text(format!("{label}: ")).bold().color(status_color(*status)),
            text(*meaning),
        ])
        .into()
    }));

    blocks
}

fn category_section(category: &CategoryResult) -> Vec<Block> {
    let mut blocks: Vec<Block> = vec![
        heading(2, &category.name).into(),
        Paragraph::new()
            .add_run(text("Beoordeling: ").bold())
            .add_run(status_run(category.status))
            .into(),
        Paragraph::new().add_run(text(category.summary.as_str())).into(),
    ];

    if let Some(education) = category_education(&category.name) {
        blocks.push(
            Paragraph::new()
                .add_run(text("Waarom is dit belangrijk? ").bold().italic().color(BRAND_LIGHT_BLUE))
                .add_run(text(education).italic().color(COLOR_GRAY))
                .into(),
        );
    }

    for check in &category.checks {
        blocks.push(
            Paragraph::new()
                .add_run(
                    text(format!("[{}] ", status_marker(check.status)))
                        .bold()
                        .color(status_color(check.status)),
                )
                .add_run(text(check.name.as_str()).bold())
                .into(),
        );
        blocks.push(
            Paragraph::new()
                .indent(Some(INDENT_FINDING), None, None, None)
                .add_run(text(check.finding.as_str()))
                .into(),
        );
        blocks.extend(check.sources.iter().map(|source| source_paragraph(source).into()));
    }

    blocks
}

fn source_paragraph(source: &Source) -> Paragraph {
    let mut paragraph = Paragraph::new().indent(Some(INDENT_SOURCE), None, None, None);
    if let Some(quote) = source.quote.as_deref().filter(|q| !q.is_empty()) {
        paragraph = paragraph.add_run(
            text(format!("\"{quote}\" "))
                .italic()
                .size(SIZE_SMALL)
                .color(COLOR_GRAY),
        );
    }
    paragraph.add_run(
        text(format!("Bron: {}", source.url))
            .size(SIZE_SMALL)
            .color(BRAND_BLUE_SOFT),
    )
}

fn sub_processor_section(result: &ComplianceResult) -> Vec<Block> {
    if result.sub_processors.is_empty() {
        return Vec::new();
    }

    let rows = std::iter::once(header_row(&["Sub-verwerker", "Doel", "Datalocatie", "Status"]))
        .chain(result.sub_processors.iter().map(sub_processor_row))
        .collect();

    vec![
        heading(2, "Sub-verwerkers").into(),
        Paragraph::new()
            .add_run(text(sub_processor_intro(&result.tool_name)))
            .into(),
        Table::new(rows).into(),
    ]
}

fn sub_processor_row(sub: &SubProcessor) -> TableRow {
    TableRow::new(vec![
        cell(text(sub.name.as_str())),
        cell(text(sub.purpose.as_str())),
        cell(text(sub.data_location.as_str())),
        cell(
            text(sub.status.as_str().to_uppercase())
                .bold()
                .color(status_color(sub.status)),
        ),
    ])
}

fn recommendation_section(status: TrafficLight) -> Vec<Block> {
    let mut blocks: Vec<Block> = vec![heading(2, "Aanbevelingen").into()];
    blocks.extend(
        recommendations(status)
            .iter()
            .map(|item| bullet(vec![text(*item)]).into()),
    );
    blocks.push(blank().into());
    blocks.push(
        Paragraph::new()
            .add_run(text(CALL_TO_ACTION).bold().color(BRAND_BLUE))
            .into(),
    );
    blocks
}

fn sources_section(sources: &[Source]) -> Vec<Block> {
    if sources.is_empty() {
        return Vec::new();
    }

    let mut blocks: Vec<Block> = vec![
        heading(2, "Geraadpleegde bronnen").into(),
        Paragraph::new().add_run(text(SOURCES_INTRO)).into(),
    ];
    blocks.extend(sources.iter().map(|source| {
        bullet(vec![
            text(format!("{}: ", source.title)).bold(),
            text(source.url.as_str()).color(BRAND_BLUE_SOFT),
        ])
        .into()
    }));
    blocks
}

fn disclaimer_section(disclaimer: &str) -> Vec<Block> {
    vec![
        Paragraph::new()
            .style("Heading2")
            .add_run(text("Disclaimer").color(COLOR_GRAY))
            .into(),
        Paragraph::new()
            .add_run(text(disclaimer).italic().size(SIZE_SMALL).color(COLOR_GRAY))
            .into(),
        Paragraph::new()
            .add_run(text(EXTRA_DISCLAIMER).italic().size(SIZE_SMALL).color(COLOR_GRAY))
            .into(),
    ]
}

fn footer() -> Vec<Block> {
    vec![
        blank().into(),
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(text("_".repeat(60)).color(COLOR_RULE))
            .into(),
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(text("&samhoud").bold().color(BRAND_BLUE))
            .into(),
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(text(TAGLINE).italic().size(SIZE_SMALL).color(BRAND_LIGHT_BLUE))
            .into(),
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(
                text(format!("{CONTACT_EMAIL}  |  samhoud.com"))
                    .size(SIZE_SMALL)
                    .color(COLOR_GRAY),
            )
            .into(),
    ]
}
