//! Output formatting utilities

use std::fmt::Write as _;
use std::str::FromStr;

use pedigree_core::{AncestryTree, Horse, HorseDetail, HorseListItem, Owner};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format '{}', expected table or json", other),
        }
    }
}

/// Serialize as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Column-aligned plain text table
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let headers: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        render_line(&mut out, &headers, &widths);
        for row in &self.rows {
            render_line(&mut out, row, &widths);
        }
        out
    }
}

fn render_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn opt_id<T: ToString>(id: Option<T>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn owner_name(owner: Option<&Owner>) -> String {
    owner.map(Owner::full_name).unwrap_or_else(|| "-".to_string())
}

/// Horse listing as a table
pub fn horse_table(items: &[HorseListItem]) -> String {
    let mut table = Table::new(vec!["ID", "NAME", "BORN", "SEX", "OWNER", "MOTHER", "FATHER"]);
    for item in items {
        let h = &item.horse;
        table.row(vec![
            h.id.to_string(),
            h.name.clone(),
            h.date_of_birth.to_string(),
            h.sex.to_string(),
            owner_name(item.owner.as_ref()),
            opt_id(h.mother_id),
            opt_id(h.father_id),
        ]);
    }
    table.render()
}

/// Owner listing as a table
pub fn owner_table(owners: &[Owner]) -> String {
    let mut table = Table::new(vec!["ID", "FIRST NAME", "LAST NAME", "EMAIL"]);
    for owner in owners {
        table.row(vec![
            owner.id.to_string(),
            owner.first_name.clone(),
            owner.last_name.clone(),
            owner.email.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.render()
}

fn horse_line(horse: &Horse) -> String {
    format!(
        "{} (id {}, {}, born {})",
        horse.name, horse.id, horse.sex, horse.date_of_birth
    )
}

/// Single horse with owner and parents
pub fn horse_detail(detail: &HorseDetail) -> String {
    let h = &detail.horse;
    let mut out = String::new();
    let _ = writeln!(out, "Horse: {}", h.name);
    let _ = writeln!(out, "  ID: {}", h.id);
    let _ = writeln!(out, "  Born: {}", h.date_of_birth);
    let _ = writeln!(out, "  Sex: {}", h.sex);
    if let Some(description) = &h.description {
        let _ = writeln!(out, "  Description: {}", description);
    }
    if let Some(owner) = &detail.owner {
        let _ = writeln!(out, "  Owner: {} (id {})", owner.full_name(), owner.id);
    }
    match (&detail.mother, h.mother_id) {
        (Some(mother), _) => {
            let _ = writeln!(out, "  Mother: {}", horse_line(&mother.horse));
        }
        (None, Some(id)) => {
            let _ = writeln!(out, "  Mother: id {} (missing)", id);
        }
        (None, None) => {}
    }
    match (&detail.father, h.father_id) {
        (Some(father), _) => {
            let _ = writeln!(out, "  Father: {}", horse_line(&father.horse));
        }
        (None, Some(id)) => {
            let _ = writeln!(out, "  Father: id {} (missing)", id);
        }
        (None, None) => {}
    }
    out
}

/// Indented family tree, mother branch first
pub fn family_tree(tree: &AncestryTree) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", horse_line(&tree.record.horse));
    write_branches(&mut out, tree, 1);
    out
}

fn write_branches(out: &mut String, tree: &AncestryTree, depth: usize) {
    let indent = "  ".repeat(depth);
    for (label, branch) in [("mother", &tree.mother), ("father", &tree.father)] {
        if let Some(parent) = branch {
            let _ = writeln!(out, "{}{}: {}", indent, label, horse_line(&parent.record.horse));
            write_branches(out, parent, depth + 1);
        }
    }
}
