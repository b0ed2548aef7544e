use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    Ready,
    StoreEmpty,
    NoStoreData,
    EmptyInput,
    NoStudents,
    StudentNotFound,
    NoScheduleForStudent,
    ScheduleLoaded,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub severity: Severity,
    pub code: StatusCode,
    pub message: String,
}

const HELP_TEXT: &str = "ℹ️ تعليمات الاستخدام:
1. أدخل رقمك الجامعي كما هو مسجل في النظام
2. اضغط \"عرض الجدول\" لمشاهدة جدولك الكامل
3. إذا لم تظهر البيانات، تأكد من تحميلها في نسخة المشرف
4. للاستفسارات: شؤون الطلاب";

impl Status {
    fn new(severity: Severity, code: StatusCode, message: impl Into<String>) -> Self {
        Status {
            severity,
            code,
            message: message.into(),
        }
    }

    pub fn ready(students: usize, entries: usize) -> Self {
        Status::new(
            Severity::Success,
            StatusCode::Ready,
            format!(
                "✅ تم تحميل {} طالب و {} مادة - أدخل رقم الطالب",
                students, entries
            ),
        )
    }

    pub fn store_empty() -> Self {
        Status::new(
            Severity::Warning,
            StatusCode::StoreEmpty,
            "⚠️ لا توجد بيانات، استخدم نسخة المشرف أولاً",
        )
    }

    pub fn no_schedule(identifier: &str) -> Self {
        Status::new(
            Severity::Warning,
            StatusCode::NoScheduleForStudent,
            format!("⚠️ لا يوجد جدول للطالب {}", identifier),
        )
    }

    pub fn schedule_loaded(name: &str) -> Self {
        Status::new(
            Severity::Success,
            StatusCode::ScheduleLoaded,
            format!("✅ تم تحميل جدول {}", name),
        )
    }

    pub fn help() -> Self {
        Status::new(Severity::Success, StatusCode::Help, HELP_TEXT)
    }
}

/// Reasons a search stops before a schedule is shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("❌ الرجاء إدخال الرقم الجامعي")]
    EmptyInput,
    #[error("❌ لا توجد بيانات في النظام")]
    NoStoreData,
    #[error("❌ لا توجد بيانات طلاب")]
    NoStudents,
    #[error("❌ الرقم الجامعي {0} غير مسجل")]
    StudentNotFound(String),
}

impl SearchError {
    pub fn code(&self) -> StatusCode {
        match self {
            SearchError::EmptyInput => StatusCode::EmptyInput,
            SearchError::NoStoreData => StatusCode::NoStoreData,
            SearchError::NoStudents => StatusCode::NoStudents,
            SearchError::StudentNotFound(_) => StatusCode::StudentNotFound,
        }
    }
}

impl From<&SearchError> for Status {
    fn from(e: &SearchError) -> Self {
        Status::new(Severity::Error, e.code(), e.to_string())
    }
}

/// The single-line banner shown under the search box.
#[derive(Debug, Clone, Default)]
pub struct StatusBanner {
    current: Option<Status>,
}

impl StatusBanner {
    pub fn report(&mut self, status: Status) -> &Status {
        match status.severity {
            Severity::Success => info!(code = ?status.code, "{}", status.message),
            Severity::Warning => warn!(code = ?status.code, "{}", status.message),
            Severity::Error => error!(code = ?status.code, "{}", status.message),
        }
        self.current.insert(status)
    }

    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }
}
