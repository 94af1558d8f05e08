// src/engine.rs

use std::{path::PathBuf, sync::Arc};
use tracing::debug;

use crate::error::EngineError;
use crate::query::{self, Selection};
use crate::record::{DeliveryRecord, RecordSet, Statistics};
use crate::stats;
use crate::store::{RecordStore, RowSource};

/// The process-wide handle every caller goes through.
///
/// Owns the [`RecordStore`]; each operation makes sure the dataset is loaded
/// (reporting the load failure if it is not) and then reads it without
/// locking. Share it behind an `Arc`.
pub struct DeliveryEngine {
    store: RecordStore,
}

impl DeliveryEngine {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(RecordStore::from_path(path))
    }

    pub fn from_source(source: impl RowSource + 'static) -> Self {
        Self::new(RecordStore::new(source))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Force the initial load now instead of on the first query.
    pub fn warm_up(&self) -> Result<usize, EngineError> {
        Ok(self.records()?.len())
    }

    pub fn records(&self) -> Result<Arc<RecordSet>, EngineError> {
        Ok(self.store.load()?)
    }

    /// Returns the ID-only sentinel when nothing matches; use
    /// [`DeliveryEngine::find_by_id`] to tell the two apart.
    pub fn get_by_id(&self, id: i64) -> Result<DeliveryRecord, EngineError> {
        let set = self.records()?;
        Ok(query::get_by_id(&set, id))
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<DeliveryRecord>, EngineError> {
        let set = self.records()?;
        Ok(query::find_by_id(&set, id).cloned())
    }

    /// Text-id variant for transports; rejects non-integers before loading.
    pub fn get_by_raw_id(&self, raw: &str) -> Result<DeliveryRecord, EngineError> {
        let id = query::parse_id(raw)?;
        self.get_by_id(id)
    }

    pub fn filter_by_country(&self, country: &str) -> Result<Selection, EngineError> {
        debug!(country, "filter by country");
        Ok(query::filter_by_country(self.records()?, country))
    }

    pub fn filter_by_vendor(&self, vendor: &str) -> Result<Selection, EngineError> {
        debug!(vendor, "filter by vendor");
        Ok(query::filter_by_vendor(self.records()?, vendor))
    }

    pub fn filter_by_shipment_mode(&self, mode: &str) -> Result<Selection, EngineError> {
        debug!(mode, "filter by shipment mode");
        Ok(query::filter_by_shipment_mode(self.records()?, mode))
    }

    pub fn list_distinct_countries(&self) -> Result<Vec<String>, EngineError> {
        Ok(query::list_distinct_countries(&*self.records()?))
    }

    pub fn list_distinct_vendors(&self) -> Result<Vec<String>, EngineError> {
        Ok(query::list_distinct_vendors(&*self.records()?))
    }

    pub fn compute_statistics(&self) -> Result<Statistics, EngineError> {
        Ok(stats::compute_statistics(&*self.records()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadError, QueryError};
    use std::{io::Write, sync::Barrier, thread};
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
ID,Project Code,PQ #,PO / SO #,ASN/DN #,Country,Managed By,Fulfill Via,Vendor,INCO Term,Shipment Mode,Line Item Value,Weight (Kilograms),Freight Cost (USD)
1,100-CI-T01,Pre-PQ Process,SCMS-4,ASN-8,Côte d'Ivoire,PMO - US,Direct Drop,RANBAXY Fine Chemicals LTD.,EXW,Air,\"1,200.50\",13,780.34
3,108-VN-T01,Pre-PQ Process,SCMS-13,ASN-85,Vietnam,PMO - US,Direct Drop,Aurobindo Pharma Limited,EXW,Air,,358,4521.5
4,100-CI-T01,Pre-PQ Process,SCMS-20,ASN-14,Côte d'Ivoire,PMO - US,Direct Drop,Abbvie Logistics Centre,FCA,Air,abc,171,Freight Included in Commodity Cost
15,108-VN-T01,Pre-PQ Process,SCMS-78,ASN-50,vietnam,PMO - US,From RDC,SCMS from RDC,N/A - From RDC,Truck,300,Weight Captured Separately,\"1,000\"
";

    fn sample_engine() -> (NamedTempFile, DeliveryEngine) {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(SAMPLE.as_bytes()).unwrap();
        let engine = DeliveryEngine::from_path(tmp.path());
        (tmp, engine)
    }

    #[test]
    fn statistics_over_csv_dataset() {
        let (_tmp, engine) = sample_engine();
        let stats = engine.compute_statistics().unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total_line_item_value, 1500.50);
        assert_eq!(stats.total_weight_kg, 542.0);
        assert_eq!(stats.total_freight_usd, 780.34 + 4521.5 + 1000.0);
        assert_eq!(engine.compute_statistics().unwrap(), stats);
    }

    #[test]
    fn lookups_and_filters_over_csv_dataset() {
        let (_tmp, engine) = sample_engine();

        let hit = engine.get_by_id(3).unwrap();
        assert_eq!(hit.purchase_order_number, "SCMS-13");
        assert_eq!(hit.inco_term, "EXW");
        assert_eq!(engine.get_by_id(2).unwrap(), DeliveryRecord::id_only(2));
        assert_eq!(engine.find_by_id(2).unwrap(), None);

        let vn: Vec<_> = engine
            .filter_by_country("VIETNAM")
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(vn, ["3", "15"]);
        assert_eq!(engine.filter_by_shipment_mode("air").unwrap().count(), 3);
        assert_eq!(
            engine.filter_by_vendor("scms from rdc").unwrap().to_vec()[0].fulfill_via,
            "From RDC"
        );
        assert_eq!(
            engine.list_distinct_countries().unwrap(),
            ["Côte d'Ivoire", "Vietnam", "vietnam"]
        );
        assert_eq!(engine.list_distinct_vendors().unwrap().len(), 4);
        assert_eq!(engine.store().load_count(), 1);
    }

    #[test]
    fn invalid_id_is_rejected_without_loading() {
        let (_tmp, engine) = sample_engine();
        let err = engine.get_by_raw_id("ten").unwrap_err();
        assert!(matches!(err, EngineError::Query(QueryError::InvalidArgument(_))));
        assert!(!engine.store().is_loaded());
        assert_eq!(engine.get_by_raw_id(" 15 ").unwrap().country, "vietnam");
    }

    #[test]
    fn load_error_reaches_every_operation() {
        let dir = tempfile::tempdir().unwrap();
        let engine = DeliveryEngine::from_path(dir.path().join("missing.csv"));

        let expect_load = |err: EngineError| {
            assert!(matches!(err, EngineError::Load(LoadError::NotFound { .. })), "{err:?}")
        };
        expect_load(engine.get_by_id(1).unwrap_err());
        expect_load(engine.filter_by_country("Haiti").unwrap_err());
        expect_load(engine.filter_by_vendor("x").unwrap_err());
        expect_load(engine.filter_by_shipment_mode("Air").unwrap_err());
        expect_load(engine.list_distinct_countries().unwrap_err());
        expect_load(engine.list_distinct_vendors().unwrap_err());
        expect_load(engine.compute_statistics().unwrap_err());
        assert_eq!(engine.store().load_count(), 1);
    }

    #[test]
    fn concurrent_mixed_operations_share_one_load() {
        let (_tmp, engine) = sample_engine();
        let threads = 12;
        let barrier = Barrier::new(threads);

        thread::scope(|s| {
            for i in 0..threads {
                let engine = &engine;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    match i % 4 {
                        0 => assert_eq!(engine.compute_statistics().unwrap().count, 4),
                        1 => assert_eq!(engine.get_by_id(4).unwrap().vendor, "Abbvie Logistics Centre"),
                        2 => assert_eq!(engine.filter_by_country("côte d'ivoire").unwrap().count(), 2),
                        _ => assert_eq!(engine.list_distinct_vendors().unwrap().len(), 4),
                    }
                });
            }
        });

        assert_eq!(engine.store().load_count(), 1);
    }

    #[test]
    fn warm_up_reports_row_count() {
        let (_tmp, engine) = sample_engine();
        assert_eq!(engine.warm_up().unwrap(), 4);
        assert!(engine.store().is_loaded());
    }
}
