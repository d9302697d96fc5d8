//! 预导入模块，方便使用

pub use super::audit_logs::{
    ActiveModel as AuditLogActiveModel, Entity as AuditLogs, Model as AuditLogModel,
};
pub use super::case_actions::{
    ActiveModel as CaseActionActiveModel, Entity as CaseActions, Model as CaseActionModel,
};
pub use super::case_number_sequences::{
    ActiveModel as CaseNumberSequenceActiveModel, Entity as CaseNumberSequences,
};
pub use super::configs::{ActiveModel as ConfigActiveModel, Entity as Configs, Model as ConfigModel};
pub use super::reports::{ActiveModel as ReportActiveModel, Entity as Reports, Model as ReportModel};
pub use super::sanction_types::{
    ActiveModel as SanctionTypeActiveModel, Entity as SanctionTypes, Model as SanctionTypeModel,
};
pub use super::sanctions::{
    ActiveModel as SanctionActiveModel, Entity as Sanctions, Model as SanctionModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::violation_cases::{
    ActiveModel as ViolationCaseActiveModel, Entity as ViolationCases,
    Model as ViolationCaseModel,
};
pub use super::violation_categories::{
    ActiveModel as ViolationCategoryActiveModel, Entity as ViolationCategories,
    Model as ViolationCategoryModel,
};
pub use super::violation_sanction_types::{
    ActiveModel as ViolationSanctionTypeActiveModel, Entity as ViolationSanctionTypes,
};
pub use super::violation_types::{
    ActiveModel as ViolationTypeActiveModel, Entity as ViolationTypes,
    Model as ViolationTypeModel,
};
pub use super::violations::{
    ActiveModel as ViolationActiveModel, Entity as Violations, Model as ViolationModel,
};
