//! Table schemas. Column names are the canonical field keys used on the wire
//! (requests, responses, and persisted rows), so they must not be renamed.

pub const ORDERS_TABLE: &str = "Orders";
pub const UPDATE_LOGS_TABLE: &str = "UpdateLogs";
pub const DELETE_LOGS_TABLE: &str = "DeleteLogs";
pub const INVOICES_TABLE: &str = "Invoices";

// Columns addressed directly by the services.
pub const COL_ORDER_ID: &str = "معرف الطلب";
pub const COL_ORDER_TIMESTAMP: &str = "وقت وتاريخ الطلب";
pub const COL_ORDER_STATUS: &str = "حالة الطلب";
pub const COL_CREATED_BY: &str = "تم الإنشاء بواسطة";
pub const COL_DELETE_TIMESTAMP: &str = "توقيت الحذف";
pub const COL_DELETE_PAYLOAD: &str = "بيانات الطلب المحذوف";
pub const COL_RESTORED: &str = "تم الاسترجاع";

pub const ORDERS_COLUMNS: &[&str] = &[
    "معرف الطلب",
    "وقت وتاريخ الطلب",
    "الاسم الكامل",
    "رقم الهاتف",
    "المنتج",
    "سعر المنتجات",
    "تكلفة الشحن",
    "التكلفة الإجمالية",
    "المنطقة",
    "طريقة التوصيل",
    "العنوان",
    "رابط الموقع",
    "حالة الطلب",
    "تم الإنشاء بواسطة",
];

pub const UPDATE_LOGS_COLUMNS: &[&str] = &[
    "توقيت التعديل",
    "تم التعديل بواسطة",
    "معرف الطلب",
    "بيانات الطلب (قبل)",
    "بيانات الطلب (بعد)",
];

pub const DELETE_LOGS_COLUMNS: &[&str] = &[
    "توقيت الحذف",
    "تم الحذف بواسطة",
    "معرف الطلب",
    "بيانات الطلب المحذوف",
    "تم الاسترجاع",
];

pub const INVOICES_COLUMNS: &[&str] = &[
    "رقم الفاتورة",
    "تاريخ الفاتورة",
    "معرف الطلب",
    "اسم العميل",
    "رقم الهاتف",
    "المنتجات",
    "سعر المنتجات",
    "تكلفة الشحن",
    "المبلغ الإجمالي",
    "العنوان",
    "المنطقة",
    "حالة الدفع",
    "تم الإنشاء بواسطة",
];

/// Header set for a registered table name, used once when a table is created.
pub fn headers_for(table: &str) -> Option<&'static [&'static str]> {
    match table {
        ORDERS_TABLE => Some(ORDERS_COLUMNS),
        UPDATE_LOGS_TABLE => Some(UPDATE_LOGS_COLUMNS),
        DELETE_LOGS_TABLE => Some(DELETE_LOGS_COLUMNS),
        INVOICES_TABLE => Some(INVOICES_COLUMNS),
        _ => None,
    }
}
