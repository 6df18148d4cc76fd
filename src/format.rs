use colored::Colorize;

use crate::advice::advise;
use crate::analysis::{PatternSummary, Recommendation};
use crate::categories::{CategorySpec, Domain};
use crate::conversation::{Reply, ReplyFormat};
use crate::ledger::{BudgetRecord, UserLedger, Wallet};

pub fn welcome() -> String {
    "💰 *Smart Allowance Tracker* 💰\n\
     \n\
     *Available Commands:*\n\
     /school_log - Log school allowance & expenses\n\
     /life_log - Log personal life expenses\n\
     /school_summary - School spending summary\n\
     /life_summary - Life expenses summary\n\
     /overall_balance - Combined wallet view\n\
     /balance - Check wallet balance\n\
     /add_money <amount> - Add money to wallet\n\
     /insights - Savings pattern analysis\n\
     /help - Show this message\n\
     /exit - Leave the shell"
        .to_string()
}

pub fn opening_prompt(domain: Domain) -> String {
    match domain {
        Domain::School => "🏫 *SCHOOL ALLOWANCE TRACKING*\n\n💰 Enter your school allowance for today:".to_string(),
        Domain::Life => "🏠 *LIFE EXPENSES TRACKING*\n\n💵 Enter your life budget for today:".to_string(),
    }
}

pub fn category_prompt(spec: &CategorySpec, threshold: f64, currency: &str) -> String {
    format!(
        "{} *{}* ({}):\nMax: {}{}\nSpent amount:",
        spec.icon,
        spec.label,
        spec.hint,
        currency,
        money(threshold)
    )
}

/// Full per-category breakdown of one record, with advice per line and
/// the guaranteed savings slice at the bottom.
pub fn domain_summary(record: &BudgetRecord, currency: &str) -> String {
    let domain = record.domain();
    let plan = domain.plan();

    let header = match domain {
        Domain::School => "🏫 *SCHOOL ALLOWANCE SUMMARY",
        Domain::Life => "🏠 *LIFE EXPENSES SUMMARY",
    };
    let amount_line = match domain {
        Domain::School => "💵 Allowance",
        Domain::Life => "💵 Budget",
    };

    let mut text = format!(
        "{} - {}*\n\n{}: {}{}\n💰 Total Saved: {}{}\n\n*Category Breakdown:*\n",
        header,
        record.date(),
        amount_line,
        currency,
        money(record.amount()),
        currency,
        money(record.total_saved())
    );

    for cat in plan.categories.iter().filter(|c| !c.guaranteed) {
        let threshold = record.thresholds().get(cat.key).copied().unwrap_or(0.0);
        let spent = record.spent().get(cat.key).copied().unwrap_or(0.0);
        let saved = threshold - spent;
        let note = advise(plan, cat.key, spent, threshold, currency);

        text.push_str(&format!(
            "\n{} {}:\n  Budget: {}{} | Spent: {}{}\n  Saved: {}{}\n  💡 {}\n",
            cat.icon,
            cat.label,
            currency,
            money(threshold),
            currency,
            money(spent),
            currency,
            money(saved),
            note
        ));
    }

    let savings = record.thresholds().get("savings").copied().unwrap_or(0.0);
    text.push_str(&format!(
        "\n💰 *Guaranteed Savings:* {}{}",
        currency,
        money(savings)
    ));

    text
}

pub fn pattern_report(summary: &PatternSummary) -> String {
    let mut text = format!(
        "🤖 *PATTERN ANALYSIS*\n\n\
         📈 *Overall Performance:*\n\
         • Average Savings Rate: {}\n\
         • Best Day: {} ({} saved)\n\
         • Most Challenging: {} ({} saved)\n",
        percent(summary.mean_rate),
        summary.best.date,
        percent(summary.best.rate),
        summary.worst.date,
        percent(summary.worst.rate)
    );

    match summary.recommendation {
        Recommendation::CutCosts => {
            text.push_str(
                "\n💡 *Recommendations:*\n\
                 • Focus on reducing food delivery costs\n\
                 • Try public transport instead of ride-hailing",
            );
        }
        Recommendation::RaiseGoal => {
            text.push_str(
                "\n💡 *Recommendations:*\n\
                 • Excellent budgeting! Consider increasing your savings goal",
            );
        }
        Recommendation::Steady => {}
    }

    text
}

pub fn wallet_balance(wallet: &Wallet, currency: &str) -> String {
    format!(
        "💼 *DIGITAL WALLET*\n\n\
         💰 *Current Balance:* {}{}\n\
         🎯 *Total Savings:* {}{}\n\n\
         💡 Use /add_money to add funds.",
        currency,
        money_cents(wallet.current_balance),
        currency,
        money_cents(wallet.total_savings)
    )
}

pub fn deposit_receipt(amount: f64, wallet: &Wallet, currency: &str) -> String {
    format!(
        "✅ *Money Added to Wallet!*\n\n\
         💵 Amount: {}{}\n\
         💰 New Balance: {}{}",
        currency,
        money_cents(amount),
        currency,
        money_cents(wallet.current_balance)
    )
}

pub fn overall_balance(user: &UserLedger, currency: &str) -> String {
    let mut text = "📊 *OVERALL FINANCIAL OVERVIEW*\n\n".to_string();

    let school = user.school.active();
    let life = user.life.active();

    match school {
        Some(record) => {
            text.push_str(&format!(
                "🏫 *School Allowance:*\n   Allowance: {}{}\n   Saved: {}{}\n\n",
                currency,
                money(record.amount()),
                currency,
                money(record.total_saved())
            ));
        }
        None => text.push_str("🏫 *School:* No data yet\n\n"),
    }

    match life {
        Some(record) => {
            text.push_str(&format!(
                "🏠 *Life Expenses:*\n   Budget: {}{}\n   Saved: {}{}\n\n",
                currency,
                money(record.amount()),
                currency,
                money(record.total_saved())
            ));
        }
        None => text.push_str("🏠 *Life:* No data yet\n\n"),
    }

    let total_amount = school.map(|r| r.amount()).unwrap_or(0.0)
        + life.map(|r| r.amount()).unwrap_or(0.0);
    let total_saved = school.map(|r| r.total_saved()).unwrap_or(0.0)
        + life.map(|r| r.total_saved()).unwrap_or(0.0);
    let rate = if total_amount > 0.0 {
        total_saved / total_amount
    } else {
        0.0
    };

    text.push_str(&format!(
        "💰 *TOTALS:*\n   Total Money: {}{}\n   Total Saved: {}{}\n   Savings Rate: {}",
        currency,
        money(total_amount),
        currency,
        money(total_saved),
        percent(rate)
    ));

    text
}

/// Render a reply for the terminal: rich replies get their *spans*
/// bolded, plain replies pass through verbatim.
pub fn render(reply: &Reply) -> String {
    match reply.format {
        ReplyFormat::Plain => reply.text.clone(),
        ReplyFormat::Rich => emphasize(&reply.text),
    }
}

fn emphasize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(start) = rest.find('*') else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('*') {
            Some(end) => {
                out.push_str(&after[..end].bold().to_string());
                rest = &after[end + 1..];
            }
            None => {
                // unmatched star, keep it literal
                out.push('*');
                out.push_str(after);
                break;
            }
        }
    }
    out
}

/// Whole-unit money display with thousands separators.
pub fn money(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group(&format!("{:.0}", rounded.abs())))
}

/// Cent-precision money display (wallet views).
pub fn money_cents(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}{}.{}", sign, group(int_part), frac_part)
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn group(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::allocate;
    use crate::categories::SCHOOL_PLAN;
    use chrono::NaiveDate;

    #[test]
    fn test_money_grouping() {
        assert_eq!(money(0.0), "0");
        assert_eq!(money(999.0), "999");
        assert_eq!(money(1000.0), "1,000");
        assert_eq!(money(1234567.4), "1,234,567");
        assert_eq!(money(-1500.0), "-1,500");
        assert_eq!(money_cents(1234.5), "1,234.50");
        assert_eq!(money_cents(0.0), "0.00");
    }

    #[test]
    fn test_emphasize_strips_markers() {
        colored::control::set_override(false);
        assert_eq!(emphasize("a *bold* word"), "a bold word");
        assert_eq!(emphasize("no markers"), "no markers");
        assert_eq!(emphasize("dangling * star"), "dangling * star");
    }

    #[test]
    fn test_summary_includes_breakdown_and_guaranteed_savings() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let thresholds = allocate(1000.0, &SCHOOL_PLAN).unwrap();
        let mut record = BudgetRecord::new(Domain::School, date, 1000.0, thresholds);
        for cat in SCHOOL_PLAN.prompted() {
            let threshold = record.thresholds()[cat.key];
            record.spent_mut().insert(cat.key.to_string(), threshold);
        }
        record.finalize();

        let text = domain_summary(&record, "₱");
        assert!(text.contains("SCHOOL ALLOWANCE SUMMARY - 2026-08-20"));
        assert!(text.contains("Allowance: ₱1,000"));
        assert!(text.contains("Transportation"));
        assert!(text.contains("Guaranteed Savings:* ₱150"));
        // savings has no breakdown entry of its own
        assert!(!text.contains("💰 Savings:"));
    }

    #[test]
    fn test_overall_balance_with_partial_data() {
        let user = UserLedger::default();
        let text = overall_balance(&user, "₱");
        assert!(text.contains("School:* No data yet"));
        assert!(text.contains("Life:* No data yet"));
        assert!(text.contains("Savings Rate: 0.0%"));
    }
}
