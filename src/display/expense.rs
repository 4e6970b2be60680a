//! Expense and settlement display formatting

use std::collections::HashMap;

use crate::models::{Expense, Member, MemberId, Settlement};

fn name_map(members: &[Member]) -> HashMap<MemberId, String> {
    members
        .iter()
        .map(|m| (m.id, m.name.clone()))
        .collect()
}

fn lookup(names: &HashMap<MemberId, String>, id: MemberId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

/// Format a list of household members as a table
pub fn format_member_list(members: &[Member]) -> String {
    if members.is_empty() {
        return "No members found.".to_string();
    }

    let name_width = members
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:<12}\n",
        "Name",
        "ID",
        "Joined",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:-<12}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for member in members {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:<12}\n",
            member.name,
            member.id.to_string(),
            member.created_at.format("%Y-%m-%d"),
            name_width = name_width,
        ));
    }

    output
}

/// Format a list of expenses as a table, with a total row
pub fn format_expense_list(expenses: &[Expense], members: &[Member]) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let names = name_map(members);

    let desc_width = expenses
        .iter()
        .map(|e| e.description.len())
        .max()
        .unwrap_or(11)
        .max(11);
    let payer_width = expenses
        .iter()
        .map(|e| lookup(&names, e.payer_id).len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<desc_width$}  {:<payer_width$}  {:>12}  {:<12}\n",
        "Date",
        "Description",
        "Payer",
        "Amount",
        "Category",
        desc_width = desc_width,
        payer_width = payer_width,
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<desc_width$}  {:-<payer_width$}  {:->12}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        desc_width = desc_width,
        payer_width = payer_width,
    ));

    for expense in expenses {
        output.push_str(&format!(
            "{:<10}  {:<desc_width$}  {:<payer_width$}  {:>12}  {:<12}\n",
            expense.date.format("%Y-%m-%d").to_string(),
            expense.description,
            lookup(&names, expense.payer_id),
            expense.amount.to_string(),
            expense.category.as_deref().unwrap_or("-"),
            desc_width = desc_width,
            payer_width = payer_width,
        ));
    }

    let total: crate::models::Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&format!(
        "{:-<10}  {:-<desc_width$}  {:-<payer_width$}  {:->12}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        desc_width = desc_width,
        payer_width = payer_width,
    ));
    output.push_str(&format!(
        "{:<10}  {:<desc_width$}  {:<payer_width$}  {:>12}\n",
        "TOTAL",
        "",
        "",
        total.to_string(),
        desc_width = desc_width,
        payer_width = payer_width,
    ));

    output
}

/// Format a single expense with its full split breakdown
pub fn format_expense_detail(expense: &Expense, members: &[Member]) -> String {
    let names = name_map(members);

    let mut output = String::new();
    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Date:        {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!("Description: {}\n", expense.description));
    if let Some(category) = &expense.category {
        output.push_str(&format!("Category:    {}\n", category));
    }
    if expense.recurring {
        output.push_str("Recurring:   yes\n");
    }
    output.push_str(&format!(
        "Paid by:     {} ({})\n",
        lookup(&names, expense.payer_id),
        expense.amount
    ));

    output.push_str("Splits:\n");
    for split in &expense.splits {
        output.push_str(&format!(
            "  {:<20}  {}\n",
            lookup(&names, split.member_id),
            split.share
        ));
    }

    output
}

/// Format a list of settlements as a table
pub fn format_settlement_list(settlements: &[Settlement], members: &[Member]) -> String {
    if settlements.is_empty() {
        return "No settlements found.".to_string();
    }

    let names = name_map(members);

    let from_width = settlements
        .iter()
        .map(|s| lookup(&names, s.from_member).len())
        .max()
        .unwrap_or(4)
        .max(4);
    let to_width = settlements
        .iter()
        .map(|s| lookup(&names, s.to_member).len())
        .max()
        .unwrap_or(2)
        .max(2);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<from_width$}  {:<to_width$}  {:>12}  {}\n",
        "Date",
        "From",
        "To",
        "Amount",
        "Note",
        from_width = from_width,
        to_width = to_width,
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<from_width$}  {:-<to_width$}  {:->12}  {:-<4}\n",
        "",
        "",
        "",
        "",
        "",
        from_width = from_width,
        to_width = to_width,
    ));

    for settlement in settlements {
        let note = if settlement.note.is_empty() {
            "-"
        } else {
            settlement.note.as_str()
        };
        output.push_str(&format!(
            "{:<10}  {:<from_width$}  {:<to_width$}  {:>12}  {}\n",
            settlement.date.format("%Y-%m-%d").to_string(),
            lookup(&names, settlement.from_member),
            lookup(&names, settlement.to_member),
            settlement.amount.to_string(),
            note,
            from_width = from_width,
            to_width = to_width,
        ));
    }

    output
}
