//! Test Data Builders
//!
//! Builder patterns for claims and users with sensible defaults, so tests
//! only spell out the fields they care about.

use chrono::{DateTime, Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimPeriod, Currency, UserId};
use domain_claims::{Claim, NewDocument};
use domain_identity::{Role, User};

use crate::fixtures::TemporalFixtures;

/// Where a built claim ends up in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Submitted,
    Approved,
    Rejected,
    Paid,
}

/// Builder for claims in any lifecycle state
pub struct TestClaimBuilder {
    lecturer_id: UserId,
    period: ClaimPeriod,
    hours_worked: Decimal,
    rate: Decimal,
    currency: Currency,
    submitted_at: DateTime<Utc>,
    note: Option<String>,
    documents: Vec<NewDocument>,
    stage: Stage,
    decided_by: String,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// A submitted claim for 10 h at R100 in the fixture month
    pub fn new() -> Self {
        let now = TemporalFixtures::now();
        Self {
            lecturer_id: UserId::new(),
            period: ClaimPeriod::containing(now.date_naive()),
            hours_worked: dec!(10),
            rate: dec!(100),
            currency: Currency::ZAR,
            submitted_at: now - Duration::hours(1),
            note: None,
            documents: Vec::new(),
            stage: Stage::Submitted,
            decided_by: "Mike Manager".to_string(),
        }
    }

    pub fn for_lecturer(mut self, lecturer_id: UserId) -> Self {
        self.lecturer_id = lecturer_id;
        self
    }

    /// Sets the period; panics on an invalid month
    pub fn in_period(mut self, year: i32, month: u32) -> Self {
        self.period = ClaimPeriod::new(year, month).expect("valid claim period");
        self
    }

    pub fn with_hours(mut self, hours: Decimal) -> Self {
        self.hours_worked = hours;
        self
    }

    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = at;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attaches a PDF document named `file_name`
    pub fn with_document(mut self, file_name: &str) -> Self {
        self.documents.push(NewDocument {
            file_name: file_name.to_string(),
            stored_file_name: format!("{}_{}", self.documents.len(), file_name),
            content_type: "application/pdf".to_string(),
            file_size: 2048,
            description: None,
        });
        self
    }

    pub fn approved(mut self) -> Self {
        self.stage = Stage::Approved;
        self
    }

    pub fn rejected(mut self) -> Self {
        self.stage = Stage::Rejected;
        self
    }

    /// Approved and already processed by a payment run
    pub fn paid(mut self) -> Self {
        self.stage = Stage::Paid;
        self
    }

    pub fn decided_by(mut self, name: impl Into<String>) -> Self {
        self.decided_by = name.into();
        self
    }

    /// Builds the claim, walking it through the lifecycle methods
    pub fn build(self) -> Claim {
        let mut claim = Claim::submitted(
            self.lecturer_id,
            self.period,
            self.hours_worked,
            self.rate,
            self.currency,
            self.submitted_at,
        );
        claim.note = self.note;
        let uploaded_at = self.submitted_at;
        claim.documents = self
            .documents
            .into_iter()
            .map(|doc| doc.attach_to(claim.id, uploaded_at))
            .collect();

        let decided_at = self.submitted_at + Duration::minutes(30);
        match self.stage {
            Stage::Submitted => {}
            Stage::Approved => claim
                .approve(&self.decided_by, decided_at)
                .expect("approve submitted claim"),
            Stage::Rejected => claim
                .reject(&self.decided_by, decided_at)
                .expect("reject submitted claim"),
            Stage::Paid => {
                claim
                    .approve(&self.decided_by, decided_at)
                    .expect("approve submitted claim");
                claim
                    .mark_paid("HR System", decided_at + Duration::minutes(30))
                    .expect("pay approved claim");
            }
        }
        claim
    }
}

/// Builder for users with generated names and emails
pub struct TestUserBuilder {
    id: UserId,
    name: String,
    email: String,
    password_hash: String,
    role: Role,
    phone_number: Option<String>,
    registered_at: DateTime<Utc>,
    is_active: bool,
}

impl Default for TestUserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUserBuilder {
    /// An active lecturer with a fake name and email
    pub fn new() -> Self {
        Self {
            id: UserId::new(),
            name: Name().fake(),
            email: SafeEmail().fake(),
            password_hash: String::new(),
            role: Role::Lecturer,
            phone_number: None,
            registered_at: TemporalFixtures::now() - Duration::days(30),
            is_active: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            phone_number: self.phone_number,
            registered_at: self.registered_at,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::ClaimStatus;

    #[test]
    fn test_default_claim_is_submitted() {
        let claim = TestClaimBuilder::new().build();
        assert_eq!(claim.status(), ClaimStatus::Submitted);
        assert_eq!(claim.total().amount(), dec!(1000));
    }

    #[test]
    fn test_paid_claim() {
        let claim = TestClaimBuilder::new().paid().build();
        assert_eq!(claim.status(), ClaimStatus::Approved);
        assert!(claim.is_paid());
        assert_eq!(claim.processed_by(), Some("Mike Manager"));
    }

    #[test]
    fn test_documents_belong_to_claim() {
        let claim = TestClaimBuilder::new().with_document("timesheet.pdf").build();
        assert_eq!(claim.documents.len(), 1);
        assert_eq!(claim.documents[0].claim_id, claim.id);
    }

    #[test]
    fn test_user_builder() {
        let user = TestUserBuilder::new().with_role(Role::Hr).inactive().build();
        assert_eq!(user.role, Role::Hr);
        assert!(!user.is_active);
        assert!(!user.name.is_empty());
        assert!(user.email.contains('@'));
    }
}
