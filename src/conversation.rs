use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use tracing::debug;

use crate::allocator::allocate;
use crate::analysis::{analyze, PatternReport};
use crate::categories::Domain;
use crate::config::Config;
use crate::error::{BaonError, Result};
use crate::format;
use crate::ledger::BudgetRecord;
use crate::store::RecordStore;

/// Outbound message for the gateway to deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub format: ReplyFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Plain,
    Rich,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            format: ReplyFormat::Plain,
        }
    }

    pub fn rich(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            format: ReplyFormat::Rich,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AwaitingAmount,
    AwaitingCategory(usize),
}

/// Ephemeral pointer to the prompt a user is expected to answer next.
/// Never persisted: a restart mid-conversation strands the partial
/// record, and the next log command starts a fresh one.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    domain: Domain,
    step: Step,
}

/// Drives the category-by-category data collection per user and serves
/// the stateless command views. One instance per process; cursors are
/// keyed by user ID and fully independent of each other.
pub struct ConversationEngine {
    store: Arc<RecordStore>,
    config: Config,
    cursors: HashMap<String, Cursor>,
}

impl ConversationEngine {
    pub fn new(store: Arc<RecordStore>, config: Config) -> Self {
        ConversationEngine {
            store,
            config,
            cursors: HashMap::new(),
        }
    }

    /// Whether a conversation is waiting on this user's next message.
    pub fn is_waiting(&self, user_id: &str) -> bool {
        self.cursors.contains_key(user_id)
    }

    pub fn welcome(&self) -> Vec<Reply> {
        vec![Reply::rich(format::welcome())]
    }

    /// Begin a logging conversation. Domains with a once-per-day policy
    /// refuse a second finalized record for the same date and point the
    /// user at the summary instead.
    pub fn start_log(&mut self, user_id: &str, domain: Domain) -> Result<Vec<Reply>> {
        self.store.ensure_user(user_id)?;

        if self.config.once_per_day(domain) {
            let today = Local::now().date_naive();
            if self.store.has_finalized_on(user_id, domain, today) {
                return Ok(vec![Reply::plain(format!(
                    "📝 You've already logged {} expenses today! Use /{}_summary to view.",
                    domain, domain
                ))]);
            }
        }

        debug!("starting {} conversation for {}", domain, user_id);
        self.cursors.insert(
            user_id.to_string(),
            Cursor {
                domain,
                step: Step::AwaitingAmount,
            },
        );
        Ok(vec![Reply::rich(format::opening_prompt(domain))])
    }

    /// Route the user's next free-text message to whatever step their
    /// cursor points at. Without a cursor the text is not part of any
    /// conversation and earns a gentle hint.
    pub fn submit(&mut self, user_id: &str, text: &str) -> Result<Vec<Reply>> {
        let Some(cursor) = self.cursors.get(user_id).copied() else {
            return Ok(vec![Reply::plain(
                "💬 No conversation in progress. Try /school_log, /life_log or /help.",
            )]);
        };

        match cursor.step {
            Step::AwaitingAmount => self.handle_amount(user_id, cursor.domain, text),
            Step::AwaitingCategory(index) => {
                self.handle_category(user_id, cursor.domain, index, text)
            }
        }
    }

    fn handle_amount(&mut self, user_id: &str, domain: Domain, text: &str) -> Result<Vec<Reply>> {
        let Some(amount) = parse_positive(text) else {
            // stay in the same step; the next reply is the same question
            return Ok(vec![Reply::plain(format!(
                "❌ Please enter a valid number for {}.",
                domain.amount_label()
            ))]);
        };

        let plan = domain.plan();
        let thresholds = allocate(amount, plan)?;
        let record = BudgetRecord::new(domain, Local::now().date_naive(), amount, thresholds);
        let first_threshold = first_prompted_threshold(&record);
        self.store.append_record(user_id, record)?;

        if let Some(cursor) = self.cursors.get_mut(user_id) {
            cursor.step = Step::AwaitingCategory(0);
        }

        let spec = plan
            .prompted_at(0)
            .ok_or_else(|| BaonError::Config(format!("{} plan has no prompted categories", domain)))?;
        Ok(vec![Reply::rich(format::category_prompt(
            spec,
            first_threshold,
            &self.config.currency,
        ))])
    }

    fn handle_category(
        &mut self,
        user_id: &str,
        domain: Domain,
        index: usize,
        text: &str,
    ) -> Result<Vec<Reply>> {
        let plan = domain.plan();
        let spec = plan
            .prompted_at(index)
            .ok_or_else(|| BaonError::Config(format!("{} plan has no category {}", domain, index)))?;

        let Some(amount) = parse_spent(text) else {
            // invalid input: re-emit the same prompt, no state change
            let threshold = self
                .store
                .user(user_id)
                .and_then(|u| u.domain(domain).active().cloned())
                .and_then(|r| r.thresholds().get(spec.key).copied())
                .unwrap_or(0.0);
            return Ok(vec![
                Reply::plain("❌ Please enter a valid number."),
                Reply::rich(format::category_prompt(spec, threshold, &self.config.currency)),
            ]);
        };

        let is_last = index + 1 == plan.prompted_count();
        let key = spec.key.to_string();
        let result = self.store.update_active_record(user_id, domain, |record| {
            record.spent_mut().insert(key, amount);
            if is_last {
                record.finalize();
            }
        });

        let record = match result {
            Ok(record) => record,
            Err(BaonError::NoActiveRecord(_)) => {
                // the record disappeared under the conversation
                self.cursors.remove(user_id);
                return Ok(vec![Reply::plain(format!(
                    "⚠️ Your in-progress record was lost. Please restart with /{}_log.",
                    domain
                ))]);
            }
            Err(e) => return Err(e),
        };

        if is_last {
            debug!("finalized {} record for {}", domain, user_id);
            self.cursors.remove(user_id);
            return Ok(self.finalized_replies(user_id, &record));
        }

        if let Some(cursor) = self.cursors.get_mut(user_id) {
            cursor.step = Step::AwaitingCategory(index + 1);
        }

        let next = plan
            .prompted_at(index + 1)
            .ok_or_else(|| BaonError::Config(format!("{} plan has no category {}", domain, index + 1)))?;
        let threshold = record.thresholds().get(next.key).copied().unwrap_or(0.0);
        Ok(vec![Reply::rich(format::category_prompt(
            next,
            threshold,
            &self.config.currency,
        ))])
    }

    fn finalized_replies(&self, user_id: &str, record: &BudgetRecord) -> Vec<Reply> {
        let mut replies = vec![Reply::rich(format::domain_summary(
            record,
            &self.config.currency,
        ))];
        if record.domain() == Domain::School {
            if let Some(report) = self.school_pattern_reply(user_id) {
                replies.push(report);
            }
        }
        replies
    }

    fn school_pattern_reply(&self, user_id: &str) -> Option<Reply> {
        let user = self.store.user(user_id)?;
        match analyze(&user.school.transactions) {
            PatternReport::Report(summary) => Some(Reply::rich(format::pattern_report(&summary))),
            PatternReport::NeedMoreData => None,
        }
    }

    /// Latest record summary for a domain, plus the automatic pattern
    /// analysis for school once enough history exists.
    pub fn summary(&self, user_id: &str, domain: Domain) -> Result<Vec<Reply>> {
        let record = self
            .store
            .user(user_id)
            .and_then(|u| u.domain(domain).active().cloned());

        let Some(record) = record else {
            let text = match domain {
                Domain::School => "📚 No school records found. Use /school_log to start tracking.",
                Domain::Life => "🏠 No life expenses found. Use /life_log to start tracking.",
            };
            return Ok(vec![Reply::plain(text)]);
        };

        let mut replies = vec![Reply::rich(format::domain_summary(
            &record,
            &self.config.currency,
        ))];
        if domain == Domain::School {
            if let Some(report) = self.school_pattern_reply(user_id) {
                replies.push(report);
            }
        }
        Ok(replies)
    }

    pub fn overall_balance(&self, user_id: &str) -> Result<Vec<Reply>> {
        let Some(user) = self.store.user(user_id) else {
            return Ok(vec![Reply::plain(
                "📊 No records found. Use /school_log or /life_log to start tracking.",
            )]);
        };
        Ok(vec![Reply::rich(format::overall_balance(
            &user,
            &self.config.currency,
        ))])
    }

    pub fn balance(&self, user_id: &str) -> Result<Vec<Reply>> {
        self.store.ensure_user(user_id)?;
        let wallet = self.store.wallet(user_id).unwrap_or_default();
        Ok(vec![Reply::rich(format::wallet_balance(
            &wallet,
            &self.config.currency,
        ))])
    }

    /// `args` is everything after the command token. Exactly one
    /// positive number is accepted; anything else is a usage reply and
    /// leaves the wallet untouched.
    pub fn add_money(&mut self, user_id: &str, args: &str) -> Result<Vec<Reply>> {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        let amount = match tokens.as_slice() {
            [one] => parse_positive(one),
            _ => None,
        };

        let Some(amount) = amount else {
            return Ok(vec![Reply::plain("❌ Usage: /add_money 1000")]);
        };

        let wallet = self.store.deposit(user_id, amount)?;
        Ok(vec![Reply::rich(format::deposit_receipt(
            amount,
            &wallet,
            &self.config.currency,
        ))])
    }

    pub fn insights(&self, user_id: &str) -> Result<Vec<Reply>> {
        let history = self
            .store
            .user(user_id)
            .map(|u| u.school.transactions)
            .unwrap_or_default();

        Ok(vec![match analyze(&history) {
            PatternReport::NeedMoreData => Reply::plain(
                "🤖 Need more data (3+ logged school days) for pattern analysis.",
            ),
            PatternReport::Report(summary) => Reply::rich(format::pattern_report(&summary)),
        }])
    }
}

fn first_prompted_threshold(record: &BudgetRecord) -> f64 {
    record
        .domain()
        .plan()
        .prompted_at(0)
        .and_then(|c| record.thresholds().get(c.key).copied())
        .unwrap_or(0.0)
}

fn parse_positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_spent(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
