//! Balance display formatting
//!
//! Formats balance reports, settle-up plans, and pairwise breakdowns for
//! terminal output.

use std::collections::HashMap;

use crate::ledger::{BalanceReport, PairwiseBreakdown, SuggestedTransfer};
use crate::models::{Member, MemberId};

fn name_of(members: &[Member], id: MemberId) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Format a balance report as a table
pub fn format_balance_report(report: &BalanceReport, members: &[Member]) -> String {
    if report.balances.is_empty() {
        return "No members in the household yet.".to_string();
    }

    let names: HashMap<MemberId, String> = members
        .iter()
        .map(|m| (m.id, m.name.clone()))
        .collect();

    let name_width = report
        .balances
        .iter()
        .map(|b| {
            names
                .get(&b.member_id)
                .map(|n| n.len())
                .unwrap_or_else(|| b.member_id.to_string().len())
        })
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}\n",
        "Member",
        "Paid",
        "Share",
        "Sent",
        "Received",
        "Net",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->12}  {:->12}  {:->12}  {:->12}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for balance in &report.balances {
        let name = names
            .get(&balance.member_id)
            .cloned()
            .unwrap_or_else(|| balance.member_id.to_string());

        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}\n",
            name,
            balance.total_paid.to_string(),
            balance.total_share.to_string(),
            balance.total_settled_out.to_string(),
            balance.total_settled_in.to_string(),
            balance.net.to_string(),
            name_width = name_width,
        ));
    }

    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->12}  {:->12}  {:->12}  {:->12}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}\n",
        "SUM",
        "",
        "",
        "",
        "",
        report.sum_of_balances.to_string(),
        name_width = name_width,
    ));

    if !report.inconsistencies.is_empty() {
        output.push('\n');
        output.push_str("Warning: the ledger contains inconsistent records:\n");
        for inconsistency in &report.inconsistencies {
            output.push_str(&format!("  - {}\n", inconsistency));
        }
    } else if !report.invariant_valid {
        output.push('\n');
        output.push_str("Warning: balances do not sum to zero.\n");
    }

    output
}

/// Format a settle-up plan as a numbered list of payments
pub fn format_settle_plan(plan: &[SuggestedTransfer], members: &[Member]) -> String {
    if plan.is_empty() {
        return "Everyone is settled up.".to_string();
    }

    let mut output = String::from("Suggested payments:\n");
    for (i, transfer) in plan.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {} pays {} {}\n",
            i + 1,
            name_of(members, transfer.from),
            name_of(members, transfer.to),
            transfer.amount
        ));
    }
    output
}

/// Format the itemized position between two members
///
/// `a` is the queried member ("you"), `b` the other party.
pub fn format_pairwise_breakdown(
    breakdown: &PairwiseBreakdown,
    members: &[Member],
    a: MemberId,
    b: MemberId,
) -> String {
    let a_name = name_of(members, a);
    let b_name = name_of(members, b);

    let mut output = format!("Between {} and {}:\n", a_name, b_name);

    if !breakdown.they_paid_you_owe.is_empty() {
        output.push_str(&format!("\n  {} paid, {} owes:\n", b_name, a_name));
        for item in &breakdown.they_paid_you_owe {
            output.push_str(&format!(
                "    {}  {:<30}  {}\n",
                item.date.format("%Y-%m-%d"),
                item.description,
                item.share
            ));
        }
    }

    if !breakdown.you_paid_they_owe.is_empty() {
        output.push_str(&format!("\n  {} paid, {} owes:\n", a_name, b_name));
        for item in &breakdown.you_paid_they_owe {
            output.push_str(&format!(
                "    {}  {:<30}  {}\n",
                item.date.format("%Y-%m-%d"),
                item.description,
                item.share
            ));
        }
    }

    if !breakdown.settlements_sent.is_empty() || !breakdown.settlements_received.is_empty() {
        output.push_str("\n  Settlements:\n");
        for payment in &breakdown.settlements_sent {
            output.push_str(&format!(
                "    {}  {} paid {}  {}\n",
                payment.date.format("%Y-%m-%d"),
                a_name,
                b_name,
                payment.amount
            ));
        }
        for payment in &breakdown.settlements_received {
            output.push_str(&format!(
                "    {}  {} paid {}  {}\n",
                payment.date.format("%Y-%m-%d"),
                b_name,
                a_name,
                payment.amount
            ));
        }
    }

    output.push('\n');
    if breakdown.net.is_positive() {
        output.push_str(&format!("  {} owes {} {}\n", a_name, b_name, breakdown.net));
    } else if breakdown.net.is_negative() {
        output.push_str(&format!(
            "  {} owes {} {}\n",
            b_name,
            a_name,
            breakdown.net.abs()
        ));
    } else {
        output.push_str("  Settled up.\n");
    }

    output
}
