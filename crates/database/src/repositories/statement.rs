//! 动态 UPDATE 语句构造
//!
//! PATCH 和重新生成都只更新部分字段，字段集合在运行时才确定。这里把"要更新哪些列"
//! 建模为固定的 [`ProposalColumn`] 枚举，列名全部是硬编码常量，用户输入只会作为
//! 位置参数（`$1`, `$2`, ...）绑定，永远不会拼接进SQL文本。
//!
//! `last_update` 不在可选列之中，[`UpdateStatement::build`] 总是把它追加在最后。

use crate::models::proposal::{ProposalRegeneration, ProposalStatus, ProposalUpdate};
use chrono::{DateTime, Utc};

/// `proposals` 表查询时返回的列
pub const PROPOSAL_COLUMNS: &str = "id, title, company_name, client_name, prompt, colors, \
     logo, client_logo, status, final_artifact_path, created_at, last_update";

/// 可以被动态更新的列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalColumn {
    Title,
    CompanyName,
    ClientName,
    Prompt,
    Colors,
    Logo,
    ClientLogo,
    Status,
    FinalArtifactPath,
}

impl ProposalColumn {
    /// 数据库中的列名
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CompanyName => "company_name",
            Self::ClientName => "client_name",
            Self::Prompt => "prompt",
            Self::Colors => "colors",
            Self::Logo => "logo",
            Self::ClientLogo => "client_logo",
            Self::Status => "status",
            Self::FinalArtifactPath => "final_artifact_path",
        }
    }
}

/// 带类型的绑定参数
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Status(ProposalStatus),
    Timestamp(DateTime<Utc>),
}

/// 构造完成的语句：SQL文本 + 按顺序排列的参数
///
/// 最后一个占位符是 `id`，不在 `binds` 中，由调用方最后绑定。
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltUpdate {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// 动态 UPDATE 语句构造器
#[derive(Debug, Clone, Default)]
pub struct UpdateStatement {
    assignments: Vec<(ProposalColumn, BindValue)>,
}

impl UpdateStatement {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, column: ProposalColumn, value: BindValue) {
        self.assignments.push((column, value));
    }

    /// 根据 PATCH 参数构造
    ///
    /// 只处理出现的字段，顺序固定为 title -> status -> final_artifact_path
    pub fn for_partial_update(update: &ProposalUpdate) -> Self {
        let mut statement = Self::new();

        if let Some(title) = &update.title {
            statement.set(ProposalColumn::Title, BindValue::Text(title.clone()));
        }
        if let Some(status) = update.status {
            statement.set(ProposalColumn::Status, BindValue::Status(status));
        }
        if let Some(path) = &update.final_artifact_path {
            statement.set(ProposalColumn::FinalArtifactPath, BindValue::Text(path.clone()));
        }

        statement
    }

    /// 根据重新生成参数构造
    ///
    /// 公司、客户、提示词、颜色总是覆盖；logo为空字符串时保留原值
    pub fn for_regeneration(regeneration: &ProposalRegeneration) -> Self {
        let mut statement = Self::new();

        statement.set(ProposalColumn::CompanyName, BindValue::Text(regeneration.company_name.clone()));
        statement.set(ProposalColumn::ClientName, BindValue::Text(regeneration.client_name.clone()));
        statement.set(ProposalColumn::Prompt, BindValue::Text(regeneration.prompt.clone()));
        statement.set(ProposalColumn::Colors, BindValue::TextArray(regeneration.colors.clone()));

        if let Some(logo) = regeneration.logo_override() {
            statement.set(ProposalColumn::Logo, BindValue::Text(logo.to_string()));
        }
        if let Some(client_logo) = regeneration.client_logo_override() {
            statement.set(ProposalColumn::ClientLogo, BindValue::Text(client_logo.to_string()));
        }

        statement
    }

    /// 已经加入的列（按加入顺序）
    pub fn columns(&self) -> Vec<ProposalColumn> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    /// 生成最终语句
    ///
    /// `now` 作为 `last_update` 的值追加在最后一个SET位置
    pub fn build(self, now: DateTime<Utc>) -> BuiltUpdate {
        let mut set_clauses = Vec::with_capacity(self.assignments.len() + 1);
        let mut binds = Vec::with_capacity(self.assignments.len() + 1);
        let mut param_idx = 1usize;

        for (column, value) in self.assignments {
            set_clauses.push(format!("{} = ${param_idx}", column.name()));
            binds.push(value);
            param_idx += 1;
        }

        set_clauses.push(format!("last_update = ${param_idx}"));
        binds.push(BindValue::Timestamp(now));
        param_idx += 1;

        let sql = format!(
            "UPDATE proposals SET {} WHERE id = ${param_idx} RETURNING {PROPOSAL_COLUMNS}",
            set_clauses.join(", ")
        );

        BuiltUpdate { sql, binds }
    }
}
