use crate::clipboard::Clipboard;
use crate::error::{BillingError, QrError};
use crate::models::Resident;
use crate::payload::build_payload;
use crate::qr::{encode_png, QrImage, QrOptions};
use crate::transaction::TransactionIdGenerator;
use crate::util::{contains_ignore_case, file_name_component};

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const COPY_ACK_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct PaymentSelection {
    pub resident: Resident,
    pub transaction_id: String,
    pub payload: String,
    pub qr: QrImage,
}

impl PaymentSelection {
    pub fn download_name(&self) -> String {
        format!(
            "QR_Payment_{}_{}.png",
            file_name_component(&self.resident.name),
            file_name_component(&self.transaction_id)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingSummary {
    pub residents: usize,
    pub nominal: Option<u64>,
    pub total: u64,
}

type PendingSet = Rc<RefCell<HashSet<u32>>>;

/// Marks a resident as generating; the mark is released when the guard drops.
struct PendingGuard {
    pending: PendingSet,
    id: u32,
}

impl PendingGuard {
    fn acquire(pending: &PendingSet, id: u32) -> Result<Self, BillingError> {
        if !pending.borrow_mut().insert(id) {
            return Err(BillingError::Busy(id));
        }
        Ok(Self {
            pending: Rc::clone(pending),
            id,
        })
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.borrow_mut().remove(&self.id);
    }
}

/// An outstanding QR generation. While it is alive the resident stays marked
/// as generating; dropping it at any point releases the mark.
pub struct QrJob {
    resident: Resident,
    transaction_id: String,
    payload: String,
    options: QrOptions,
    epoch: u64,
    _pending: PendingGuard,
}

impl QrJob {
    pub fn resident_id(&self) -> u32 {
        self.resident.id
    }

    /// Encodes the payload. Does not touch the view.
    pub fn run(self) -> QrOutcome {
        let result = encode_png(&self.payload, &self.options);
        QrOutcome { job: self, result }
    }
}

pub struct QrOutcome {
    job: QrJob,
    result: Result<QrImage, QrError>,
}

pub struct BillingView {
    residents: Vec<Resident>,
    options: QrOptions,
    generator: TransactionIdGenerator,
    pending: PendingSet,
    selected: Option<PaymentSelection>,
    copied_at: Option<Instant>,
    epoch: u64,
}

impl BillingView {
    pub fn new(
        residents: Vec<Resident>,
        options: QrOptions,
        generator: TransactionIdGenerator,
    ) -> Self {
        Self {
            residents,
            options,
            generator,
            pending: Rc::new(RefCell::new(HashSet::new())),
            selected: None,
            copied_at: None,
            epoch: 0,
        }
    }

    /// Residents whose name or address contains `term`, ignoring case.
    pub fn filter(&self, term: &str) -> Vec<&Resident> {
        let term = term.trim();
        self.residents
            .iter()
            .filter(|resident| {
                term.is_empty()
                    || contains_ignore_case(&resident.name, term)
                    || contains_ignore_case(&resident.address, term)
            })
            .collect()
    }

    pub fn summary(&self, term: &str) -> BillingSummary {
        let filtered = self.filter(term);
        let total = filtered.iter().map(|resident| resident.amount).sum();
        let nominal = match filtered.first() {
            Some(first) if filtered.iter().all(|r| r.amount == first.amount) => Some(first.amount),
            _ => None,
        };
        BillingSummary {
            residents: filtered.len(),
            nominal,
            total,
        }
    }

    pub fn is_generating(&self, id: u32) -> bool {
        self.pending.borrow().contains(&id)
    }

    pub fn selected(&self) -> Option<&PaymentSelection> {
        self.selected.as_ref()
    }

    pub fn begin_qr(&mut self, id: u32) -> Result<QrJob, BillingError> {
        self.begin_qr_at(id, Utc::now())
    }

    /// Issues a transaction id and payload for one resident and marks the
    /// resident as generating until the returned job is completed or dropped.
    pub fn begin_qr_at(&mut self, id: u32, now: DateTime<Utc>) -> Result<QrJob, BillingError> {
        let resident = self
            .residents
            .iter()
            .find(|resident| resident.id == id)
            .cloned()
            .ok_or(BillingError::UnknownResident(id))?;

        let pending = PendingGuard::acquire(&self.pending, id)?;
        let transaction = self.generator.next_id_at(now);
        let payload = build_payload(&resident, &transaction.value, transaction.issued_at)
            .to_text()
            .map_err(|err| {
                log::error!("payload for resident {} failed: {}", id, err);
                BillingError::from(err)
            })?;

        Ok(QrJob {
            resident,
            transaction_id: transaction.value,
            payload,
            options: self.options.clone(),
            epoch: self.epoch,
            _pending: pending,
        })
    }

    /// Applies a finished job. Returns `Ok(None)` when the selection was
    /// closed after the job began; the result is discarded in that case.
    /// On failure the selection is cleared.
    pub fn complete_qr(
        &mut self,
        outcome: QrOutcome,
    ) -> Result<Option<&PaymentSelection>, BillingError> {
        let QrOutcome { job, result } = outcome;
        let QrJob {
            resident,
            transaction_id,
            payload,
            epoch,
            _pending: pending,
            ..
        } = job;
        drop(pending);

        if epoch != self.epoch {
            log::debug!(
                "discarding payment {} for resident {}: selection closed",
                transaction_id,
                resident.id
            );
            return Ok(None);
        }

        match result {
            Ok(qr) => {
                log::info!(
                    "generated payment {} for resident {} ({})",
                    transaction_id,
                    resident.id,
                    resident.name
                );
                self.copied_at = None;
                let selection: &PaymentSelection = self.selected.insert(PaymentSelection {
                    resident,
                    transaction_id,
                    payload,
                    qr,
                });
                Ok(Some(selection))
            }
            Err(err) => {
                log::error!("QR generation failed for resident {}: {}", resident.id, err);
                self.selected = None;
                self.copied_at = None;
                Err(err.into())
            }
        }
    }

    pub fn download(&self, dir: &Path) -> Result<PathBuf, BillingError> {
        let selection = self.selected.as_ref().ok_or(BillingError::NoSelection)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(selection.download_name());
        std::fs::write(&path, &selection.qr.png)?;
        log::info!("wrote {}", path.display());
        Ok(path)
    }

    pub fn copy_payload(&mut self, clipboard: &mut dyn Clipboard) -> Result<(), BillingError> {
        self.copy_payload_at(clipboard, Instant::now())
    }

    pub fn copy_payload_at(
        &mut self,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<(), BillingError> {
        let selection = self.selected.as_ref().ok_or(BillingError::NoSelection)?;
        match clipboard.write_text(&selection.payload) {
            Ok(()) => {
                self.copied_at = Some(now);
                Ok(())
            }
            Err(err) => {
                log::error!("copying payload {} failed: {}", selection.transaction_id, err);
                self.selected = None;
                self.copied_at = None;
                Err(BillingError::Clipboard(err))
            }
        }
    }

    pub fn copy_acknowledged(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_ACK_WINDOW)
            .unwrap_or(false)
    }

    /// Clears the selection; jobs begun before this are discarded on completion.
    pub fn close(&mut self) {
        self.selected = None;
        self.copied_at = None;
        self.epoch += 1;
    }
}
