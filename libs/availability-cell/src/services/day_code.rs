//! Day-of-week normalization shared by every piece of date logic in the cell.
//!
//! Working sessions arrive with whatever token the scheduling UI stored:
//! English or Portuguese, abbreviated or not, with or without the `-feira`
//! suffix and accents, and in older rows a bare 0-6 index. Everything goes
//! through [`DAY_CODES`]; a token missing from the table resolves to `None`
//! and never matches a date.

use chrono::Weekday;

/// Lower-cased token -> weekday. Sunday is index 0.
pub static DAY_CODES: &[(&str, Weekday)] = &[
    ("0", Weekday::Sun),
    ("sun", Weekday::Sun),
    ("sunday", Weekday::Sun),
    ("dom", Weekday::Sun),
    ("domingo", Weekday::Sun),
    ("1", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("monday", Weekday::Mon),
    ("seg", Weekday::Mon),
    ("segunda", Weekday::Mon),
    ("segunda-feira", Weekday::Mon),
    ("segunda feira", Weekday::Mon),
    ("2", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("tuesday", Weekday::Tue),
    ("ter", Weekday::Tue),
    ("terça", Weekday::Tue),
    ("terca", Weekday::Tue),
    ("terça-feira", Weekday::Tue),
    ("terca-feira", Weekday::Tue),
    ("terça feira", Weekday::Tue),
    ("terca feira", Weekday::Tue),
    ("3", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("wednesday", Weekday::Wed),
    ("qua", Weekday::Wed),
    ("quarta", Weekday::Wed),
    ("quarta-feira", Weekday::Wed),
    ("quarta feira", Weekday::Wed),
    ("4", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("thursday", Weekday::Thu),
    ("qui", Weekday::Thu),
    ("quinta", Weekday::Thu),
    ("quinta-feira", Weekday::Thu),
    ("quinta feira", Weekday::Thu),
    ("5", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("friday", Weekday::Fri),
    ("sex", Weekday::Fri),
    ("sexta", Weekday::Fri),
    ("sexta-feira", Weekday::Fri),
    ("sexta feira", Weekday::Fri),
    ("6", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("saturday", Weekday::Sat),
    ("sab", Weekday::Sat),
    ("sáb", Weekday::Sat),
    ("sabado", Weekday::Sat),
    ("sábado", Weekday::Sat),
];

pub fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}

pub fn resolve(code: &str) -> Option<Weekday> {
    let key = normalize(code);
    DAY_CODES
        .iter()
        .find(|(token, _)| *token == key)
        .map(|(_, weekday)| *weekday)
}
