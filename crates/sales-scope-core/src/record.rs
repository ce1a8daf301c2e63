//! Dataset record model.
//!
//! Records are kept exactly as they arrive from the CSV import: every column
//! is a string, keyed by the original report header. Typed views (dates,
//! ages, quantities) are derived on demand in [`crate::parse`], never at load
//! time, so a single malformed cell cannot poison the dataset.

use serde::{Deserialize, Serialize};

/// One sales transaction, as stored in the JSON dataset.
///
/// Rust field names follow crate conventions; the serialized form keeps the
/// original report column headers so the dataset file stays interchangeable
/// with the CSV export it was converted from. Missing columns deserialize as
/// empty strings instead of failing the whole file, and unknown columns are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, rename = "Date")]
    pub date: String,
    #[serde(default, rename = "Customer Name")]
    pub customer_name: String,
    #[serde(default, rename = "Phone Number")]
    pub phone_number: String,
    #[serde(default, rename = "Customer Region")]
    pub customer_region: String,
    #[serde(default, rename = "Gender")]
    pub gender: String,
    #[serde(default, rename = "Age")]
    pub age: String,
    #[serde(default, rename = "Product Name")]
    pub product_name: String,
    #[serde(default, rename = "Product Category")]
    pub product_category: String,
    #[serde(default, rename = "Brand")]
    pub brand: String,
    #[serde(default, rename = "Quantity")]
    pub quantity: String,
    #[serde(default, rename = "Price per Unit")]
    pub price_per_unit: String,
    #[serde(default, rename = "Discount Percentage")]
    pub discount_percentage: String,
    #[serde(default, rename = "Total Amount")]
    pub total_amount: String,
    #[serde(default, rename = "Final Amount")]
    pub final_amount: String,
    #[serde(default, rename = "Payment Method")]
    pub payment_method: String,
    #[serde(default, rename = "Order Status")]
    pub order_status: String,
    #[serde(default, rename = "Delivery Type")]
    pub delivery_type: String,
    #[serde(default, rename = "Store Location")]
    pub store_location: String,
    #[serde(default, rename = "Employee Name")]
    pub employee_name: String,
    /// Comma-separated labels, e.g. `"vip, bulk-order"`.
    #[serde(default, rename = "Tags")]
    pub tags: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_from_report_column_headers() {
        let value = json!({
            "Date": "2024-01-15",
            "Customer Name": "Ayesha Khan",
            "Phone Number": "555-0142",
            "Customer Region": "North",
            "Gender": "Female",
            "Age": "34",
            "Product Name": "Desk Lamp",
            "Product Category": "Home",
            "Brand": "Lumina",
            "Quantity": "2",
            "Price per Unit": "24.99",
            "Discount Percentage": "10",
            "Total Amount": "49.98",
            "Final Amount": "44.98",
            "Payment Method": "Credit Card",
            "Order Status": "Delivered",
            "Delivery Type": "Standard",
            "Store Location": "Leeds",
            "Employee Name": "Tom Bright",
            "Tags": "vip, repeat"
        });

        let record: Record = serde_json::from_value(value).unwrap();
        assert_eq!(record.customer_name, "Ayesha Khan");
        assert_eq!(record.customer_region, "North");
        assert_eq!(record.price_per_unit, "24.99");
        assert_eq!(record.tags, "vip, repeat");
    }

    #[test]
    fn missing_columns_default_to_empty_strings() {
        let record: Record = serde_json::from_value(json!({
            "Customer Name": "Lone Field"
        }))
        .unwrap();
        assert_eq!(record.customer_name, "Lone Field");
        assert_eq!(record.date, "");
        assert_eq!(record.tags, "");
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let record: Record = serde_json::from_value(json!({
            "Customer Name": "Extra Col",
            "Internal Ref": "should not matter"
        }))
        .unwrap();
        assert_eq!(record.customer_name, "Extra Col");
    }

    #[test]
    fn serializes_with_report_column_headers() {
        let record = Record {
            customer_name: "Ayesha Khan".to_string(),
            quantity: "3".to_string(),
            ..Record::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Customer Name"], "Ayesha Khan");
        assert_eq!(value["Quantity"], "3");
        // Every column is present even when empty, matching the import output.
        assert_eq!(value["Payment Method"], "");
    }
}
