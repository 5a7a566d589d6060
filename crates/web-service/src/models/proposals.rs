//! 提案接口数据结构
//!
//! json字段名沿用现有前端和生成服务约定的命名（`titulo`、`nomeEmpresa`……），
//! Rust侧统一使用英文字段名。

use chrono::{DateTime, Utc};
use database::{NewProposal, ProposalRecord, ProposalRegeneration, ProposalStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError};

/// 十六进制颜色，`#rgb` 或 `#rrggbb`
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("hex color regex is valid"));

/// 颜色列表中的每一项都必须是十六进制颜色
fn validate_colors(colors: &[String]) -> Result<(), ValidationError> {
    match colors.iter().find(|c| !HEX_COLOR.is_match(c)) {
        None => Ok(()),
        Some(bad) => {
            let mut err = ValidationError::new("hex_color")
                .with_message(Cow::Owned(format!("'{bad}' is not a valid hex color")));
            err.add_param(Cow::Borrowed("value"), bad);
            Err(err)
        }
    }
}

/// 可选的URL：空字符串视为未提供
fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message(Cow::Borrowed("must be a valid URL")))
    }
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<ProposalStatus>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("status").with_message(Cow::Borrowed("must be one of draft, sent, approved")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// 创建提案请求
///
/// 缺失的字段按空值处理，由校验规则统一报错
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
#[serde(default)]
pub struct ProposalCreate {
    #[serde(rename = "titulo")]
    #[schema(example = "Proposta de site institucional")]
    #[validate(length(min = 3, max = 100))]
    /// 提案标题，3~100个字符
    pub title: String,

    #[serde(rename = "nomeEmpresa")]
    #[schema(example = "Acme")]
    #[validate(length(min = 1))]
    pub company_name: String,

    #[serde(rename = "nomeCliente")]
    #[schema(example = "Maria Silva")]
    #[validate(length(min = 1))]
    pub client_name: String,

    #[schema(example = "Crie uma proposta para um site institucional")]
    #[validate(length(min = 20))]
    /// 生成提示词，至少20个字符
    pub prompt: String,

    #[serde(rename = "cores")]
    #[schema(example = json!(["#fff", "#123456"]))]
    #[validate(length(min = 1), custom(function = "validate_colors"))]
    pub colors: Vec<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub logo: Option<String>,

    #[serde(rename = "logoCliente")]
    #[validate(custom(function = "validate_optional_url"))]
    pub client_logo: Option<String>,

    #[schema(example = "draft")]
    #[validate(custom(function = "validate_status"))]
    /// 状态：draft / sent / approved
    pub status: String,
}

impl ProposalCreate {
    /// 转换为数据库创建参数
    ///
    /// 新提案总是以 `draft` 状态写入，空logo按未提供处理
    pub fn into_new_proposal(self, id: Uuid) -> NewProposal {
        NewProposal {
            id,
            title: self.title,
            company_name: self.company_name,
            client_name: self.client_name,
            prompt: self.prompt,
            colors: self.colors,
            logo: non_empty(self.logo),
            client_logo: non_empty(self.client_logo),
            status: ProposalStatus::Draft,
        }
    }
}

/// 部分更新请求
///
/// 字段缺失（或为null）表示不修改
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct ProposalPatch {
    #[serde(rename = "titulo", default)]
    #[validate(length(min = 3, max = 100))]
    pub title: Option<String>,

    #[serde(default)]
    #[schema(example = "approved")]
    /// 状态值在服务层校验
    pub status: Option<String>,

    #[serde(rename = "arquivoFinal", default)]
    pub final_artifact_path: Option<String>,
}

/// 重新生成请求
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
#[serde(default)]
pub struct ProposalRegenerate {
    #[serde(rename = "nomeEmpresa")]
    #[validate(length(min = 1))]
    pub company_name: String,

    #[serde(rename = "nomeCliente")]
    #[validate(length(min = 1))]
    pub client_name: String,

    #[validate(length(min = 20))]
    pub prompt: String,

    #[serde(rename = "cores")]
    #[validate(length(min = 1), custom(function = "validate_colors"))]
    pub colors: Vec<String>,

    /// 为空时保留原有logo
    #[validate(custom(function = "validate_optional_url"))]
    pub logo: Option<String>,

    /// 为空时保留原有客户logo
    #[serde(rename = "logoCliente")]
    #[validate(custom(function = "validate_optional_url"))]
    pub client_logo: Option<String>,
}

impl From<ProposalRegenerate> for ProposalRegeneration {
    fn from(input: ProposalRegenerate) -> Self {
        ProposalRegeneration {
            company_name: input.company_name,
            client_name: input.client_name,
            prompt: input.prompt,
            colors: input.colors,
            logo: input.logo,
            client_logo: input.client_logo,
        }
    }
}

/// 提案信息
///
/// 既是接口返回值，也是发送给生成服务的请求体
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ProposalInfo {
    pub id: Uuid,

    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "nomeEmpresa")]
    pub company_name: String,

    #[serde(rename = "nomeCliente")]
    pub client_name: String,

    pub prompt: String,

    #[serde(rename = "cores")]
    pub colors: Vec<String>,

    pub logo: Option<String>,

    #[serde(rename = "logoCliente")]
    pub client_logo: Option<String>,

    #[schema(value_type = String, example = "draft")]
    pub status: ProposalStatus,

    #[serde(rename = "arquivoFinal")]
    /// 生成的PDF路径，生成成功之前为null
    pub final_artifact_path: Option<String>,

    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "lastUpdate")]
    pub last_update: DateTime<Utc>,
}

impl From<ProposalRecord> for ProposalInfo {
    fn from(record: ProposalRecord) -> Self {
        ProposalInfo {
            id: record.id,
            title: record.title,
            company_name: record.company_name,
            client_name: record.client_name,
            prompt: record.prompt,
            colors: record.colors,
            logo: record.logo,
            client_logo: record.client_logo,
            status: record.status,
            final_artifact_path: record.final_artifact_path,
            created_at: record.created_at,
            last_update: record.last_update,
        }
    }
}
