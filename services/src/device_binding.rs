use sea_orm::DatabaseConnection;

use crate::error::AppError;

pub use db::models::student::Model as Student;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOutcome {
    /// Fingerprint matches the stored binding.
    Bound,
    /// Bound to another device. Nothing was written.
    Mismatch,
    /// This call created the binding.
    FirstBindDone,
}

/// Enforces that each roll number is only ever used from one device.
#[derive(Clone)]
pub struct DeviceBindingVerifier {
    db: DatabaseConnection,
}

impl DeviceBindingVerifier {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Unknown students are created already bound; unbound students are
    /// bound in place. Both writes are single conditional statements, so two
    /// first logins racing from different devices bind exactly one of them.
    pub async fn verify(
        &self,
        roll_number: &str,
        fingerprint: &str,
    ) -> Result<BindingOutcome, AppError> {
        if Student::create_bound_if_absent(&self.db, roll_number, fingerprint).await? {
            tracing::info!(roll_number, fingerprint, "New student bound on first login");
            return Ok(BindingOutcome::FirstBindDone);
        }
        if Student::bind_fingerprint_if_unbound(&self.db, roll_number, fingerprint).await? {
            tracing::info!(roll_number, fingerprint, "Device bound on first login");
            return Ok(BindingOutcome::FirstBindDone);
        }

        let student = Student::find_by_roll_number(&self.db, roll_number)
            .await?
            .ok_or_else(|| AppError::UnknownStudent(roll_number.to_owned()))?;

        match student.device_fingerprint.as_deref() {
            Some(stored) if stored == fingerprint => Ok(BindingOutcome::Bound),
            Some(stored) => {
                tracing::warn!(
                    roll_number,
                    expected = stored,
                    presented = fingerprint,
                    "Proxy attempt: device mismatch"
                );
                Ok(BindingOutcome::Mismatch)
            }
            // Cleared by a reset between our bind attempt and the read.
            None => {
                if Student::bind_fingerprint_if_unbound(&self.db, roll_number, fingerprint).await? {
                    Ok(BindingOutcome::FirstBindDone)
                } else {
                    Ok(BindingOutcome::Mismatch)
                }
            }
        }
    }

    /// Like [`Self::verify`] but turns a mismatch into `AccessDenied`.
    pub async fn require(
        &self,
        roll_number: &str,
        fingerprint: &str,
    ) -> Result<BindingOutcome, AppError> {
        match self.verify(roll_number, fingerprint).await? {
            BindingOutcome::Mismatch => Err(AppError::AccessDenied),
            ok => Ok(ok),
        }
    }

    /// Administrative override: forget the bound device so the next login
    /// binds afresh.
    pub async fn reset(&self, roll_number: &str) -> Result<(), AppError> {
        if Student::clear_fingerprint(&self.db, roll_number).await? {
            tracing::info!(roll_number, "Device binding cleared");
            Ok(())
        } else {
            Err(AppError::UnknownStudent(roll_number.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;

    #[tokio::test]
    async fn first_login_binds_then_mismatch_is_denied() {
        let db = setup_test_db().await;
        let v = DeviceBindingVerifier::new(db.clone());

        assert_eq!(v.verify("101", "AA:BB").await.unwrap(), BindingOutcome::FirstBindDone);
        assert_eq!(v.verify("101", "AA:BB").await.unwrap(), BindingOutcome::Bound);
        assert_eq!(v.verify("101", "CC:DD").await.unwrap(), BindingOutcome::Mismatch);

        let s = Student::find_by_roll_number(&db, "101").await.unwrap().unwrap();
        assert_eq!(s.device_fingerprint.as_deref(), Some("AA:BB"));
    }

    #[tokio::test]
    async fn enrolled_but_unbound_student_is_bound_in_place() {
        let db = setup_test_db().await;
        Student::create(&db, "102", "Amit Patel", Some("SY-CS-A"), None)
            .await
            .unwrap();
        let v = DeviceBindingVerifier::new(db.clone());

        assert_eq!(v.verify("102", "AA:BB").await.unwrap(), BindingOutcome::FirstBindDone);
        let s = Student::find_by_roll_number(&db, "102").await.unwrap().unwrap();
        assert_eq!(s.name, "Amit Patel");
        assert_eq!(s.classroom.as_deref(), Some("SY-CS-A"));
    }

    #[tokio::test]
    async fn require_maps_mismatch_to_access_denied() {
        let db = setup_test_db().await;
        let v = DeviceBindingVerifier::new(db);
        v.verify("101", "AA:BB").await.unwrap();

        assert!(matches!(v.require("101", "CC:DD").await, Err(AppError::AccessDenied)));
        assert_eq!(v.require("101", "AA:BB").await.unwrap(), BindingOutcome::Bound);
    }

    #[tokio::test]
    async fn reset_allows_rebinding() {
        let db = setup_test_db().await;
        let v = DeviceBindingVerifier::new(db);
        v.verify("101", "AA:BB").await.unwrap();

        v.reset("101").await.unwrap();
        assert_eq!(v.verify("101", "CC:DD").await.unwrap(), BindingOutcome::FirstBindDone);
        assert_eq!(v.verify("101", "AA:BB").await.unwrap(), BindingOutcome::Mismatch);

        assert!(matches!(v.reset("999").await, Err(AppError::UnknownStudent(r)) if r == "999"));
    }
}
