// src/record.rs

use serde::{Deserialize, Serialize};

/// One delivery row in canonical shape. Every field is text; numeric columns
/// are interpreted only by the statistics aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ProjectCode")]
    pub project_code: String,
    #[serde(rename = "PQNumber")]
    pub pq_number: String,
    #[serde(rename = "PurchaseOrderNumber")]
    pub purchase_order_number: String,
    #[serde(rename = "ShipmentNoticeNumber")]
    pub shipment_notice_number: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "ManagedBy")]
    pub managed_by: String,
    #[serde(rename = "FulfillVia")]
    pub fulfill_via: String,
    #[serde(rename = "Vendor")]
    pub vendor: String,
    #[serde(rename = "IncoTerm")]
    pub inco_term: String,
    #[serde(rename = "ShipmentMode")]
    pub shipment_mode: String,
    #[serde(rename = "LineItemValue")]
    pub line_item_value: String,
    #[serde(rename = "WeightKg")]
    pub weight_kg: String,
    #[serde(rename = "FreightCostUSD")]
    pub freight_cost_usd: String,
}

/// Canonical field names, used to address a record column generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    ProjectCode,
    PqNumber,
    PurchaseOrderNumber,
    ShipmentNoticeNumber,
    Country,
    ManagedBy,
    FulfillVia,
    Vendor,
    IncoTerm,
    ShipmentMode,
    LineItemValue,
    WeightKg,
    FreightCostUsd,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Id,
        Field::ProjectCode,
        Field::PqNumber,
        Field::PurchaseOrderNumber,
        Field::ShipmentNoticeNumber,
        Field::Country,
        Field::ManagedBy,
        Field::FulfillVia,
        Field::Vendor,
        Field::IncoTerm,
        Field::ShipmentMode,
        Field::LineItemValue,
        Field::WeightKg,
        Field::FreightCostUsd,
    ];

    /// Name used on the wire and in JSON datasets.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::ProjectCode => "ProjectCode",
            Field::PqNumber => "PQNumber",
            Field::PurchaseOrderNumber => "PurchaseOrderNumber",
            Field::ShipmentNoticeNumber => "ShipmentNoticeNumber",
            Field::Country => "Country",
            Field::ManagedBy => "ManagedBy",
            Field::FulfillVia => "FulfillVia",
            Field::Vendor => "Vendor",
            Field::IncoTerm => "IncoTerm",
            Field::ShipmentMode => "ShipmentMode",
            Field::LineItemValue => "LineItemValue",
            Field::WeightKg => "WeightKg",
            Field::FreightCostUsd => "FreightCostUSD",
        }
    }

    /// Column header used by the SCMS delivery history export.
    pub fn source_column(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::ProjectCode => "Project Code",
            Field::PqNumber => "PQ #",
            Field::PurchaseOrderNumber => "PO / SO #",
            Field::ShipmentNoticeNumber => "ASN/DN #",
            Field::Country => "Country",
            Field::ManagedBy => "Managed By",
            Field::FulfillVia => "Fulfill Via",
            Field::Vendor => "Vendor",
            Field::IncoTerm => "INCO Term",
            Field::ShipmentMode => "Shipment Mode",
            Field::LineItemValue => "Line Item Value",
            Field::WeightKg => "Weight (Kilograms)",
            Field::FreightCostUsd => "Freight Cost (USD)",
        }
    }
}

impl DeliveryRecord {
    /// The "not found" answer of a point lookup: only `id` is populated.
    pub fn id_only(id: i64) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::ProjectCode => &self.project_code,
            Field::PqNumber => &self.pq_number,
            Field::PurchaseOrderNumber => &self.purchase_order_number,
            Field::ShipmentNoticeNumber => &self.shipment_notice_number,
            Field::Country => &self.country,
            Field::ManagedBy => &self.managed_by,
            Field::FulfillVia => &self.fulfill_via,
            Field::Vendor => &self.vendor,
            Field::IncoTerm => &self.inco_term,
            Field::ShipmentMode => &self.shipment_mode,
            Field::LineItemValue => &self.line_item_value,
            Field::WeightKg => &self.weight_kg,
            Field::FreightCostUsd => &self.freight_cost_usd,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Id => &mut self.id,
            Field::ProjectCode => &mut self.project_code,
            Field::PqNumber => &mut self.pq_number,
            Field::PurchaseOrderNumber => &mut self.purchase_order_number,
            Field::ShipmentNoticeNumber => &mut self.shipment_notice_number,
            Field::Country => &mut self.country,
            Field::ManagedBy => &mut self.managed_by,
            Field::FulfillVia => &mut self.fulfill_via,
            Field::Vendor => &mut self.vendor,
            Field::IncoTerm => &mut self.inco_term,
            Field::ShipmentMode => &mut self.shipment_mode,
            Field::LineItemValue => &mut self.line_item_value,
            Field::WeightKg => &mut self.weight_kg,
            Field::FreightCostUsd => &mut self.freight_cost_usd,
        }
    }

    /// The `ID` column as an integer, if it holds one.
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.trim().parse().ok()
    }
}

/// The whole dataset in source order. Built once, then only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<DeliveryRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<DeliveryRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeliveryRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[DeliveryRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a DeliveryRecord;
    type IntoIter = std::slice::Iter<'a, DeliveryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Dataset-wide totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: u64,
    #[serde(rename = "totalLineItemValue")]
    pub total_line_item_value: f64,
    #[serde(rename = "totalWeightKg")]
    pub total_weight_kg: f64,
    #[serde(rename = "totalFreightUSD")]
    pub total_freight_usd: f64,
}
