use crate::core::clock::BusinessClock;
use crate::core::session::Aggregator;
use crate::db::checklists::insert_checklist;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::models::checklist::{Checklist, ChecklistKind};
use crate::models::work_session::WorkSession;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Outcome of a checklist submission.
#[derive(Debug)]
pub struct Submission {
    pub checklist: Checklist,
    pub session: WorkSession,
}

pub struct ChecklistLogic;

impl ChecklistLogic {
    /// Record a checklist and clock the driver in (pre-trip) or out
    /// (post-trip). The session change, the checklist row and the audit line
    /// commit together; any failure leaves the database untouched.
    ///
    /// The write lock is taken up front, so a concurrent submission waits for
    /// `busy_timeout` and then sees this one's result.
    pub fn submit(
        conn: &Connection,
        clock: &BusinessClock,
        mut checklist: Checklist,
    ) -> AppResult<Submission> {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

        let session = {
            let agg = Aggregator::new(&*tx, clock);
            let (driver, at) = (&checklist.driver_id, checklist.submitted_at);
            match checklist.kind {
                ChecklistKind::Pre => agg.start_session(driver, at)?,
                ChecklistKind::Post => agg.end_session(driver, at)?,
            }
        };

        checklist.session_id = Some(session.id);
        checklist.id = insert_checklist(&tx, &checklist)?;

        let defects = checklist.defects().count();
        ttlog(
            &tx,
            &format!("checklist_{}", checklist.kind.to_db_str()),
            checklist.driver_id.as_str(),
            &format!(
                "{} for session {} ({} item(s), {} defect(s))",
                checklist.kind.label(),
                session.id,
                checklist.items.len(),
                defects
            ),
        )?;

        tx.commit()?;

        if defects > 0 {
            tracing::warn!(
                driver = %checklist.driver_id,
                vehicle = checklist.vehicle_id.as_deref().unwrap_or("-"),
                defects,
                "checklist submitted with defects"
            );
        }

        Ok(Submission { checklist, session })
    }
}
