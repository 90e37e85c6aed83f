//! One-line transaction entry.
//!
//! Grammar: `AMOUNT DESCRIPTION.. [#category] [@item]`, e.g.
//! `12.5 spesa al mercato #Spesa @Alimentari`. Tags are resolved against
//! the loaded lists by the caller; at most one of each.

#[derive(Debug, Clone, PartialEq)]
pub struct QuickAddParsed {
    pub amount: f64,
    pub description: String,
    pub category: Option<String>,
    pub budget_item: Option<String>,
}

pub fn parse(input: &str) -> Result<QuickAddParsed, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Inserisci un importo.".to_string());
    }

    let mut parts = trimmed.splitn(2, ' ');
    let amount_raw = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim();

    let amount = amount_raw
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| "Importo non valido.".to_string())?;
    if amount <= 0.0 {
        return Err("Importo deve essere > 0.".to_string());
    }

    let (category, budget_item, description) = parse_tags(rest)?;
    if description.is_empty() {
        return Err("Descrizione mancante.".to_string());
    }

    Ok(QuickAddParsed {
        amount,
        description,
        category,
        budget_item,
    })
}

fn parse_tags(rest: &str) -> Result<(Option<String>, Option<String>, String), String> {
    let mut category: Option<String> = None;
    let mut budget_item: Option<String> = None;
    let mut kept: Vec<&str> = Vec::new();

    for token in rest.split_whitespace() {
        if let Some(name) = token.strip_prefix('#') {
            if name.is_empty() {
                kept.push(token);
                continue;
            }
            if category.is_some() {
                return Err("Troppe categorie: massimo 1.".to_string());
            }
            category = Some(name.to_string());
        } else if let Some(name) = token.strip_prefix('@') {
            if name.is_empty() {
                kept.push(token);
                continue;
            }
            if budget_item.is_some() {
                return Err("Troppe voci di budget: massimo 1.".to_string());
            }
            budget_item = Some(name.to_string());
        } else {
            kept.push(token);
        }
    }

    Ok((category, budget_item, kept.join(" ")))
}
