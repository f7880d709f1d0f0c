//! 比較演算子
//!
//! 入力構文は `"<op> <value>"`。演算子が見つからなければ `like` とみなす。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Operator {
    Equal,
    NotEqual,
    #[default]
    Like,
    NotLike,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    StartsWith,
    EndsWith,
}

impl Operator {
    /// 構文上のトークン（パース時の試行順）
    const PARSE_ORDER: [Operator; 10] = [
        Operator::NotEqual,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Like,
        Operator::NotLike,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Equal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
        }
    }

    /// 数値比較を試みる演算子か
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterOrEqual
                | Operator::LessThan
                | Operator::LessOrEqual
        )
    }

    /// 一致箇所をハイライトできる演算子か
    pub fn highlights(&self) -> bool {
        matches!(
            self,
            Operator::Equal | Operator::Like | Operator::StartsWith | Operator::EndsWith
        )
    }

    /// `actual`（データ側）と `expected`（フィルタ側）を比較する
    pub fn evaluate(&self, actual: &str, expected: &str) -> bool {
        match self {
            Operator::Equal => actual.trim() == expected.trim(),
            Operator::NotEqual => actual.trim() != expected.trim(),
            Operator::Like => contains_ignore_case(actual, expected),
            Operator::NotLike => !contains_ignore_case(actual, expected),
            Operator::GreaterThan => compare(actual, expected).is_gt(),
            Operator::GreaterOrEqual => compare(actual, expected).is_ge(),
            Operator::LessThan => compare(actual, expected).is_lt(),
            Operator::LessOrEqual => compare(actual, expected).is_le(),
            Operator::StartsWith => actual.to_lowercase().starts_with(&expected.to_lowercase()),
            Operator::EndsWith => actual.to_lowercase().ends_with(&expected.to_lowercase()),
        }
    }
}

/// 大文字小文字を無視した部分一致
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 両辺が数値なら数値比較、そうでなければ文字列比較
fn compare(actual: &str, expected: &str) -> Ordering {
    match (parse_number(actual), parse_number(expected)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => actual.cmp(expected),
    }
}

/// 先頭の数値部分を読む（`"10 kg"` → 10）
///
/// 符号、整数部、小数部、指数部の順。無限大は `Infinity` の綴りだけ受け付ける。
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::PARSE_ORDER
            .into_iter()
            .find(|op| op.as_str() == lowered)
            .ok_or_else(|| format!("Unknown operator: {}", s))
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl TryFrom<String> for Operator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// パース済みのフィルタ式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    operator: Operator,
    operand: String,
}

impl FilterExpr {
    pub fn new(operator: Operator, operand: impl Into<String>) -> Self {
        Self {
            operator,
            operand: operand.into(),
        }
    }

    /// 演算子を解釈せず `like` として扱う
    pub fn like(input: &str) -> Self {
        Self::new(Operator::Like, input)
    }

    /// `"<op> <value>"` をパースする
    ///
    /// - 前後の空白は除去
    /// - 演算子の後には1文字以上の空白と、空でない値が必要
    /// - 演算子は大文字小文字を区別しない
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        for op in Operator::PARSE_ORDER {
            let token = op.as_str();
            let Some(head) = input.get(..token.len()) else {
                continue;
            };
            if !head.eq_ignore_ascii_case(token) {
                continue;
            }

            let rest = &input[token.len()..];
            if !rest.starts_with(char::is_whitespace) {
                continue;
            }

            let operand = rest.trim();
            if operand.is_empty() {
                continue;
            }

            return Self::new(op, operand);
        }

        Self::like(input)
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &str {
        &self.operand
    }

    /// データ値がこの式を満たすか
    pub fn evaluate(&self, actual: &str) -> bool {
        self.operator.evaluate(actual, &self.operand)
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Like => f.write_str(&self.operand),
            op => write!(f, "{} {}", op, self.operand),
        }
    }
}

#[cfg(test)]
#[path = "operator_test.rs"]
mod tests;
