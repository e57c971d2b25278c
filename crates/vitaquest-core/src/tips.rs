//! Tip engagement scoring.
//!
//! Pure operations over the tip-view record list. Each returns the XP
//! granted by that call; first-time actions award once, repeats award
//! nothing. Chat messages are the exception: every message awards.
//!
//! Callers route the returned XP through the store's XP setter so level
//! transitions stay consistent.

use crate::model::{TipRef, TipViewRecord, Verdict};

/// XP for viewing a tip the first time.
pub const XP_TIP_VIEW: i64 = 50;
/// XP for asking a suggested question the first time.
pub const XP_TIP_QUESTION: i64 = 25;
/// XP for giving a tip its first verdict.
pub const XP_TIP_VERDICT: i64 = 25;
/// XP per chat message sent in a tip's context (uncapped).
pub const XP_CHAT_MESSAGE: i64 = 5;

fn find_or_create<'a>(records: &'a mut Vec<TipViewRecord>, tip: &TipRef) -> &'a mut TipViewRecord {
    if let Some(idx) = records.iter().position(|r| r.matches(tip)) {
        &mut records[idx]
    } else {
        records.push(TipViewRecord::new(tip));
        records.last_mut().expect("just pushed")
    }
}

/// First view of a tip creates its record and awards [`XP_TIP_VIEW`];
/// repeat views return 0 and leave the record untouched.
pub fn record_view(records: &mut Vec<TipViewRecord>, tip: &TipRef) -> i64 {
    if records.iter().any(|r| r.matches(tip)) {
        return 0;
    }
    let mut record = TipViewRecord::new(tip);
    record.xp_earned = XP_TIP_VIEW;
    records.push(record);
    XP_TIP_VIEW
}

/// Set-insert `question_key` into the tip's asked questions.
///
/// Awards [`XP_TIP_QUESTION`] only when the key was not present before.
/// Creates the record if the tip was never viewed.
pub fn record_question(
    records: &mut Vec<TipViewRecord>,
    tip: &TipRef,
    question_key: &str,
) -> i64 {
    let record = find_or_create(records, tip);
    if record.asked_questions.iter().any(|q| q == question_key) {
        return 0;
    }
    record.asked_questions.push(question_key.to_string());
    record.xp_earned += XP_TIP_QUESTION;
    XP_TIP_QUESTION
}

/// Set or overwrite the tip's verdict.
///
/// Awards [`XP_TIP_VERDICT`] only on the transition from no verdict to
/// some verdict; overwriting an existing verdict never re-awards.
pub fn record_verdict(records: &mut Vec<TipViewRecord>, tip: &TipRef, verdict: Verdict) -> i64 {
    let record = find_or_create(records, tip);
    let first = record.verdict.is_none();
    record.verdict = Some(verdict);
    if first {
        record.xp_earned += XP_TIP_VERDICT;
        XP_TIP_VERDICT
    } else {
        0
    }
}

/// Award [`XP_CHAT_MESSAGE`] for a chat message in the tip's context.
/// Every call awards; there is no first-time rule.
pub fn record_chat_message(records: &mut Vec<TipViewRecord>, tip: &TipRef) -> i64 {
    let record = find_or_create(records, tip);
    record.xp_earned += XP_CHAT_MESSAGE;
    XP_CHAT_MESSAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tip() -> TipRef {
        TipRef::new("sleep", "wind-down", "tip-1")
    }

    #[test]
    fn first_view_awards_repeat_does_not() {
        let mut records = Vec::new();
        assert_eq!(record_view(&mut records, &tip()), XP_TIP_VIEW);
        assert_eq!(records.len(), 1);
        let before = records.clone();

        assert_eq!(record_view(&mut records, &tip()), 0);
        assert_eq!(records, before);
    }

    #[test]
    fn distinct_tips_each_award() {
        let mut records = Vec::new();
        assert_eq!(record_view(&mut records, &tip()), XP_TIP_VIEW);
        let other = TipRef::new("sleep", "wind-down", "tip-2");
        assert_eq!(record_view(&mut records, &other), XP_TIP_VIEW);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn questions_have_set_semantics() {
        let mut records = Vec::new();
        record_view(&mut records, &tip());

        assert_eq!(record_question(&mut records, &tip(), "why"), XP_TIP_QUESTION);
        assert_eq!(record_question(&mut records, &tip(), "why"), 0);
        assert_eq!(record_question(&mut records, &tip(), "how"), XP_TIP_QUESTION);
        assert_eq!(records[0].asked_questions, vec!["why", "how"]);
        assert_eq!(records[0].xp_earned, XP_TIP_VIEW + 2 * XP_TIP_QUESTION);
    }

    #[test]
    fn question_without_prior_view_creates_record() {
        let mut records = Vec::new();
        assert_eq!(record_question(&mut records, &tip(), "why"), XP_TIP_QUESTION);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].xp_earned, XP_TIP_QUESTION);
    }

    #[test]
    fn verdict_awards_only_on_first_set() {
        let mut records = Vec::new();
        record_view(&mut records, &tip());

        assert_eq!(
            record_verdict(&mut records, &tip(), Verdict::Interested),
            XP_TIP_VERDICT
        );
        // Re-selection overwrites but never re-awards.
        assert_eq!(record_verdict(&mut records, &tip(), Verdict::AlreadyWorks), 0);
        assert_eq!(records[0].verdict, Some(Verdict::AlreadyWorks));
        assert_eq!(records[0].xp_earned, XP_TIP_VIEW + XP_TIP_VERDICT);
    }

    #[test]
    fn chat_messages_award_every_time() {
        let mut records = Vec::new();
        for _ in 0..3 {
            assert_eq!(record_chat_message(&mut records, &tip()), XP_CHAT_MESSAGE);
        }
        assert_eq!(records[0].xp_earned, 3 * XP_CHAT_MESSAGE);
    }
}
