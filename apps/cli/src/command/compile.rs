use std::path::PathBuf;

use search_core::{ClauseValue, IndexConfig, Operator, SearchRequest};

use super::{Command, OpenedSchema};
use crate::error::{OptionExt, Result};

pub struct CompileCommand {
    pub config: IndexConfig,
    pub schema: PathBuf,
    pub clauses: Vec<String>,
    pub text: Option<String>,
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub returning: Vec<String>,
}

impl CompileCommand {
    fn build_request(&self) -> Result<SearchRequest> {
        let opened = OpenedSchema::open(&self.config, &self.schema)?;
        let mut query = opened
            .registry
            .search(&opened.file.owner, opened.file.qualifier.as_deref())?;

        for clause in &self.clauses {
            let (field, op, value) = parse_where(clause)?;
            query.where_field(field, op, value)?;
        }
        if let Some(text) = &self.text {
            query.with_text(text.as_str())?;
        }
        if let Some(order) = &self.order {
            query.order_by(order)?;
        }
        if let Some(limit) = self.limit {
            query.limit(limit)?;
        }
        if let Some(offset) = self.offset {
            query.offset(offset)?;
        }
        if !self.returning.is_empty() {
            query.returning(self.returning.iter().cloned())?;
        }

        Ok(query.compile()?)
    }
}

impl Command for CompileCommand {
    fn execute(&self) -> Result<()> {
        let request = self.build_request()?;
        for (key, value) in request.to_params() {
            println!("{}={}", key, value);
        }
        Ok(())
    }
}

/// 解析 `field operator value`
///
/// `any` 的值用逗号分隔；`within_range` 接受 `lo..hi`，其他形式原样传递；
/// 单引号包裹的值总是字符串。
pub fn parse_where(clause: &str) -> Result<(&str, Operator, ClauseValue)> {
    let (field, rest) = clause
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_eyre("expected \"field operator value\"")?;
    let (op, value) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_eyre("expected \"field operator value\"")?;

    let op: Operator = op.parse()?;
    let value = value.trim();
    let value = match op {
        Operator::Any => ClauseValue::List(value.split(',').map(|v| scalar(v.trim())).collect()),
        Operator::WithinRange => range(value),
        _ => scalar(value),
    };
    Ok((field, op, value))
}

fn scalar(raw: &str) -> ClauseValue {
    if let Some(quoted) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return ClauseValue::Text(quoted.to_string());
    }
    raw.parse::<i64>()
        .map(ClauseValue::Int)
        .unwrap_or_else(|_| ClauseValue::Text(raw.to_string()))
}

fn range(raw: &str) -> ClauseValue {
    if let Some((lo, hi)) = raw.split_once("..") {
        if let (Ok(lo), Ok(hi)) = (lo.trim().parse::<i64>(), hi.trim().parse::<i64>()) {
            return ClauseValue::Range(lo, hi);
        }
    }
    ClauseValue::Text(raw.to_string())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("customer_id == A1234", "customer_id", Operator::Equals, ClauseValue::from("A1234"))]
    #[case("customer_id == '123'", "customer_id", Operator::Equals, ClauseValue::from("123"))]
    #[case("helpfulness  >  123", "helpfulness", Operator::GreaterThan, ClauseValue::Int(123))]
    #[case("helpfulness <= -2", "helpfulness", Operator::LessOrEqual, ClauseValue::Int(-2))]
    #[case("customer_id any ABC, DEF", "customer_id", Operator::Any, ClauseValue::from(vec!["ABC", "DEF"]))]
    #[case("helpfulness within_range 1..5", "helpfulness", Operator::WithinRange, ClauseValue::Range(1, 5))]
    #[case("helpfulness within_range 10..", "helpfulness", Operator::WithinRange, ClauseValue::from("10.."))]
    #[case("body != 'two words'", "body", Operator::NotEquals, ClauseValue::from("two words"))]
    fn test_parse_where(
        #[case] clause: &str,
        #[case] field: &str,
        #[case] op: Operator,
        #[case] value: ClauseValue,
    ) {
        assert_eq!(parse_where(clause).unwrap(), (field, op, value));
    }

    #[rstest]
    #[case("helpfulness")]
    #[case("helpfulness >")]
    #[case("helpfulness ~ 3")]
    fn test_parse_where_rejects(#[case] clause: &str) {
        assert!(parse_where(clause).is_err());
    }

    fn command(clauses: &[&str], text: Option<&str>) -> (tempfile::TempDir, CompileCommand) {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("review.toml");
        std::fs::write(
            &schema,
            "owner = \"review\"\n\n[[field]]\nname = \"helpfulness\"\ntype = \"uint\"\n\n[[field]]\nname = \"customer_id\"\ntype = \"literal\"\n",
        )
        .unwrap();

        let cmd = CompileCommand {
            config: IndexConfig::default(),
            schema,
            clauses: clauses.iter().map(|c| c.to_string()).collect(),
            text: text.map(str::to_string),
            order: Some("-helpfulness".to_string()),
            limit: Some(25),
            offset: None,
            returning: vec!["review_id".to_string()],
        };
        (dir, cmd)
    }

    #[test]
    fn test_build_request() {
        let (_dir, cmd) = command(&["customer_id == A1234", "helpfulness > 123"], Some("great"));
        let params = cmd.build_request().unwrap().to_params();
        assert_eq!(
            params,
            vec![
                ("q", "great".to_string()),
                ("bq", "(and customer_id:'A1234' helpfulness:124..)".to_string()),
                ("rank", "-helpfulness".to_string()),
                ("size", "25".to_string()),
                ("return-fields", "review_id".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_fails() {
        let (_dir, cmd) = command(&[], None);
        let err = cmd.build_request().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<search_core::SearchError>(),
            Some(e) if e.is_no_clauses()
        ));
    }

    #[test]
    fn test_unknown_field_fails() {
        let (_dir, cmd) = command(&["rating == 5"], None);
        assert!(cmd.build_request().is_err());
    }
}
