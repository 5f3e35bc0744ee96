use super::DocumentExtractor;
use crate::domain::document::UploadedFile;
use crate::domain::error::{AppError, Result};

impl DocumentExtractor {
    pub(super) fn parse_docx(&self, file: &UploadedFile) -> Result<String> {
        let docx = docx_rs::read_docx(&file.bytes).map_err(|e| {
            AppError::Extraction(format!("Failed to read DOCX '{}': {}", file.name, e))
        })?;

        let mut lines = Vec::new();
        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => {
                    push_non_blank(&mut lines, paragraph_text(paragraph));
                }
                docx_rs::DocumentChild::Table(table) => table_lines(table, &mut lines),
                _ => {}
            }
        }

        Ok(lines.join("\n"))
    }
}

fn push_non_blank(lines: &mut Vec<String>, text: String) {
    if !text.trim().is_empty() {
        lines.push(text);
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        paragraph_child_text(child, &mut buffer);
    }
    buffer
}

fn paragraph_child_text(child: &docx_rs::ParagraphChild, buffer: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => run_text(run, buffer),
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                paragraph_child_text(link_child, buffer);
            }
        }
        docx_rs::ParagraphChild::Insert(insert) => {
            for insert_child in &insert.children {
                if let docx_rs::InsertChild::Run(run) = insert_child {
                    run_text(run, buffer);
                }
            }
        }
        _ => {}
    }
}

fn run_text(run: &docx_rs::Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => buffer.push_str(&text.text),
            docx_rs::RunChild::Tab(_) | docx_rs::RunChild::PTab(_) => buffer.push('\t'),
            docx_rs::RunChild::Break(_) => buffer.push('\n'),
            docx_rs::RunChild::Sym(sym) => buffer.push_str(&sym.char),
            _ => {}
        }
    }
}

/// One line per row, cells joined with " | ".
fn table_lines(table: &docx_rs::Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row;
        let mut cells = Vec::new();
        for cell in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell;
            let text = cell_text(cell);
            if !text.trim().is_empty() {
                cells.push(text);
            }
        }
        push_non_blank(lines, cells.join(" | "));
    }
}

fn cell_text(cell: &docx_rs::TableCell) -> String {
    let mut parts = Vec::new();
    for content in &cell.children {
        match content {
            docx_rs::TableCellContent::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph);
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
            docx_rs::TableCellContent::Table(table) => {
                let mut nested = Vec::new();
                table_lines(table, &mut nested);
                if !nested.is_empty() {
                    parts.push(nested.join(" "));
                }
            }
            _ => {}
        }
    }
    parts.join(" ")
}
