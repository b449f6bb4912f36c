// search-core/src/search.rs
//! 查询构建与执行
//!
//! `QueryBuilder` 累积子句，第一次执行后冻结：之后任何修改都返回
//! `AlreadyMaterialized`，结果被缓存，重复遍历不会重新请求。
//! 单个构建器不是线程安全的。

use std::collections::BTreeSet;

use query::{ClauseValue, CompileError, DEFAULT_LIMIT, Operator, SearchRequest, render_clause};

use crate::error::{Result, SearchError};
use crate::response::{Hit, SearchResponse};
use crate::schema::IndexSchema;

enum QueryState {
    NotExecuted,
    Executed(SearchResponse),
}

/// 针对单个域的查询
pub struct QueryBuilder<'a, R> {
    schema: &'a IndexSchema<R>,
    clauses: Vec<String>,
    free_text: Option<String>,
    rank: Option<String>,
    limit: usize,
    offset: Option<usize>,
    return_fields: BTreeSet<String>,
    fatal_warnings: bool,
    state: QueryState,
}

impl<'a, R> QueryBuilder<'a, R> {
    /// 新查询；`fatal_warnings` 默认关闭
    pub fn new(schema: &'a IndexSchema<R>) -> Self {
        Self {
            schema,
            clauses: Vec::new(),
            free_text: None,
            rank: None,
            limit: DEFAULT_LIMIT,
            offset: None,
            return_fields: BTreeSet::new(),
            fatal_warnings: false,
            state: QueryState::NotExecuted,
        }
    }

    pub fn schema(&self) -> &'a IndexSchema<R> {
        self.schema
    }

    pub fn is_executed(&self) -> bool {
        matches!(self.state, QueryState::Executed(_))
    }

    /// 结果中的警告是否作为错误抛出
    pub fn fatal_warnings(&mut self, fatal: bool) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.fatal_warnings = fatal;
        Ok(self)
    }

    /// `field == value`
    pub fn where_equals(&mut self, field: &str, value: impl Into<ClauseValue>) -> Result<&mut Self> {
        self.where_field(field, Operator::Equals, value)
    }

    /// 添加一个子句；字段必须已在 schema 中定义
    pub fn where_field(
        &mut self,
        field: &str,
        op: Operator,
        value: impl Into<ClauseValue>,
    ) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let clause = self.render(field, op, value.into())?;
        self.clauses.push(clause);
        Ok(self)
    }

    /// 多个相等子句；任一失败时一个都不添加
    pub fn where_map<K, V, I>(&mut self, mapping: I) -> Result<&mut Self>
    where
        K: AsRef<str>,
        V: Into<ClauseValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.ensure_mutable()?;
        let clauses = mapping
            .into_iter()
            .map(|(field, value)| self.render(field.as_ref(), Operator::Equals, value.into()))
            .collect::<Result<Vec<_>>>()?;
        self.clauses.extend(clauses);
        Ok(self)
    }

    fn render(&self, field: &str, op: Operator, value: ClauseValue) -> Result<String> {
        let spec = self.schema.field(field).ok_or_else(|| SearchError::UnknownField {
            domain: self.schema.name().to_string(),
            field: field.to_string(),
        })?;

        let clause = render_clause(field, spec.field_type(), op, &value)?;
        tracing::trace!("[查询] 子句 {}", clause);
        Ok(clause)
    }

    /// 设置全文检索部分，覆盖之前的值
    pub fn with_text(&mut self, phrase: impl Into<String>) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.free_text = Some(phrase.into());
        Ok(self)
    }

    /// 排序表达式，如 `-helpfulness`
    pub fn order_by(&mut self, rank_expression: &str) -> Result<&mut Self> {
        self.ensure_mutable()?;
        if rank_expression.trim().is_empty() {
            return Err(CompileError::InvalidValue {
                field: "rank".to_string(),
                value: rank_expression.to_string(),
                reason: "empty rank expression".to_string(),
            }
            .into());
        }
        self.rank = Some(rank_expression.to_string());
        Ok(self)
    }

    pub fn limit(&mut self, count: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.limit = count;
        Ok(self)
    }

    pub fn offset(&mut self, count: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.offset = Some(count);
        Ok(self)
    }

    /// 追加返回字段（集合，重复的会合并）
    pub fn returning<I, S>(&mut self, fields: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_mutable()?;
        for field in fields {
            let field = field.into();
            if field.trim().is_empty() {
                return Err(CompileError::InvalidValue {
                    field: "return-fields".to_string(),
                    value: field,
                    reason: "empty field name".to_string(),
                }
                .into());
            }
            self.return_fields.insert(field);
        }
        Ok(self)
    }

    /// 生成请求；没有子句也没有全文时返回 `NoClauses`
    pub fn compile(&self) -> Result<SearchRequest> {
        let mut request = SearchRequest::from_parts(self.free_text.as_deref(), &self.clauses)?;
        request.rank = self.rank.clone();
        request.limit = self.limit;
        request.offset = self.offset;
        request.return_fields = self.return_fields.clone();
        Ok(request)
    }

    /// 执行查询
    ///
    /// 已执行过时直接返回 `false`。响应被缓存后才检查警告，所以即使因
    /// `fatal_warnings` 报错，结果仍然可以遍历。
    ///
    /// 编译、endpoint 或传输失败时查询保持未执行，可以重试。请求已发出但
    /// 响应无法解析时查询同样冻结，之后的 `found_count`/`hits` 返回
    /// `MalformedResponse` 而不重新请求。
    pub fn execute(&mut self) -> Result<bool> {
        if self.is_executed() {
            return Ok(false);
        }

        let request = self.compile()?;
        let span = tracing::info_span!("index.execute_query", domain = %self.schema.name());
        let raw = span.in_scope(|| -> Result<serde_json::Value> {
            let endpoint = self.schema.search_endpoint()?;
            tracing::debug!(
                "[查询] {} bq={:?} q={:?}",
                endpoint,
                request.boolean_query,
                request.free_text
            );
            Ok(self.schema.client().search(&endpoint, &request.to_params())?)
        })?;

        let response = match SearchResponse::from_json(raw) {
            Ok(response) => response,
            Err(err) => {
                self.state = QueryState::Executed(SearchResponse::default());
                return Err(err);
            }
        };

        let mut first_warning = None;
        for warning in response.warnings() {
            tracing::warn!("[查询] 远程警告 {}: {}", warning.code, warning.message);
            if first_warning.is_none() {
                first_warning = Some(warning.clone());
            }
        }
        self.state = QueryState::Executed(response);

        match first_warning {
            Some(warning) if self.fatal_warnings => Err(SearchError::WarningInQueryResult {
                code: warning.code,
                message: warning.message,
            }),
            _ => Ok(true),
        }
    }

    /// 缓存的响应（未执行时为 `None`）
    pub fn response(&self) -> Option<&SearchResponse> {
        match &self.state {
            QueryState::Executed(response) => Some(response),
            QueryState::NotExecuted => None,
        }
    }

    /// 远程报告的命中总数
    pub fn found_count(&mut self) -> Result<u64> {
        self.execute()?;
        Ok(self.executed_response()?.hits()?.found)
    }

    /// 遍历命中；可重复调用，不会重新请求
    pub fn hits(&mut self) -> Result<std::slice::Iter<'_, Hit>> {
        self.execute()?;
        Ok(self.executed_response()?.hits()?.hit.iter())
    }

    fn executed_response(&self) -> Result<&SearchResponse> {
        self.response()
            .ok_or_else(|| SearchError::MalformedResponse("查询尚未执行".to_string()))
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_executed() {
            Err(SearchError::AlreadyMaterialized)
        } else {
            Ok(())
        }
    }
}
