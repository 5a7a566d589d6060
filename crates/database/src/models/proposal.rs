//! 提案数据库模型
//!
//! 定义 `proposals` 表对应的结构体，以及创建/更新时使用的参数结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, FromRow, Postgres, Type};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 提案状态
///
/// 只有三个合法值，数据库中以小写英文文本存储（并带有 `CHECK` 约束）。
/// 旧版前端使用的葡萄牙语取值 `rascunho`/`enviado`/`aprovado` 在输入时仍然可以识别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[serde(alias = "rascunho")]
    Draft,
    #[serde(alias = "enviado")]
    Sent,
    #[serde(alias = "aprovado")]
    Approved,
}

impl ProposalStatus {
    /// 全部合法状态
    pub const ALL: [ProposalStatus; 3] = [Self::Draft, Self::Sent, Self::Approved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 无法识别的状态值
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无效的提案状态: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ProposalStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" | "rascunho" => Ok(Self::Draft),
            "sent" | "enviado" => Ok(Self::Sent),
            "approved" | "aprovado" => Ok(Self::Approved),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// 状态以TEXT存储，编解码直接委托给 &str
impl Type<Postgres> for ProposalStatus {
    fn type_info() -> PgTypeInfo {
        <str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for ProposalStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for ProposalStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// `proposals` 表中的一行
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProposalRecord {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub client_name: String,
    pub prompt: String,
    pub colors: Vec<String>,
    pub logo: Option<String>,
    pub client_logo: Option<String>,
    pub status: ProposalStatus,
    /// 生成的PDF路径，只有生成成功并落盘后才会有值
    pub final_artifact_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

/// 提案创建参数
///
/// `id` 由服务层生成，时间戳由仓库层在写入时填充
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub client_name: String,
    pub prompt: String,
    pub colors: Vec<String>,
    pub logo: Option<String>,
    pub client_logo: Option<String>,
    pub status: ProposalStatus,
}

/// 提案部分更新参数
///
/// `None` 表示不修改该字段；`Some("")` 表示显式设置为空字符串，两者含义不同。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalUpdate {
    pub title: Option<String>,
    pub status: Option<ProposalStatus>,
    pub final_artifact_path: Option<String>,
}

impl ProposalUpdate {
    /// 没有任何需要修改的字段（此时仍然会刷新 `last_update`）
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.status.is_none() && self.final_artifact_path.is_none()
    }
}

/// 提案重新生成参数
///
/// 公司、客户、提示词和颜色总是覆盖；两个logo只有在非空时才覆盖。
#[derive(Debug, Clone)]
pub struct ProposalRegeneration {
    pub company_name: String,
    pub client_name: String,
    pub prompt: String,
    pub colors: Vec<String>,
    pub logo: Option<String>,
    pub client_logo: Option<String>,
}

impl ProposalRegeneration {
    /// 需要覆盖的logo，空字符串视为"保留原值"
    pub fn logo_override(&self) -> Option<&str> {
        non_empty(self.logo.as_deref())
    }

    /// 需要覆盖的客户logo，空字符串视为"保留原值"
    pub fn client_logo_override(&self) -> Option<&str> {
        non_empty(self.client_logo.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
