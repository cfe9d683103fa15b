//! Building the publishable status-list credential.
//!
//! The bitstring is published as a credential in its own right: same
//! envelope as a badge, `StatusList2021Credential` type, the encoded
//! list as its subject. The draft returned here is unsigned — it goes
//! through the same signing path as any other credential.

use obadge_core::Timestamp;
use obadge_vc::{
    CredentialSubject, IssuerProfile, OpenBadgeCredential, StatusListSubject,
    CONTEXT_CREDENTIALS_V1, CONTEXT_STATUS_LIST_2021, TYPE_STATUS_LIST_CREDENTIAL,
    TYPE_VERIFIABLE_CREDENTIAL,
};

use crate::store::StatusListRecord;

/// An unsigned status-list credential for the list's current bitstring.
pub fn build_status_list_credential(
    record: &StatusListRecord,
    issuer: IssuerProfile,
) -> OpenBadgeCredential {
    OpenBadgeCredential {
        context: vec![
            CONTEXT_CREDENTIALS_V1.to_string(),
            CONTEXT_STATUS_LIST_2021.to_string(),
        ],
        id: Some(record.url.clone()),
        credential_type: vec![
            TYPE_VERIFIABLE_CREDENTIAL.to_string(),
            TYPE_STATUS_LIST_CREDENTIAL.to_string(),
        ],
        issuer,
        issuance_date: Timestamp::now(),
        expiration_date: None,
        credential_subject: CredentialSubject::StatusList(StatusListSubject {
            id: Some(format!("{}#list", record.url)),
            subject_type: "StatusList2021".to_string(),
            status_purpose: record.purpose,
            encoded_list: record.encoded_list.clone(),
        }),
        credential_status: None,
        proof: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::create_encoded_bit_string;
    use obadge_core::StatusListId;
    use obadge_vc::StatusPurpose;

    #[test]
    fn draft_is_structurally_valid() {
        let record = StatusListRecord {
            id: StatusListId::new(),
            url: "https://badges.example.org/status/7".to_string(),
            purpose: StatusPurpose::Revocation,
            size_bits: 64,
            encoded_list: create_encoded_bit_string(64).unwrap(),
            version: 0,
        };
        let credential =
            build_status_list_credential(&record, IssuerProfile::new("did:key:z6MkT", "Registrar"));

        assert!(credential.structure_errors().is_empty());
        assert!(credential.proof.is_empty());
        assert_eq!(credential.id.as_deref(), Some(record.url.as_str()));
        let subject = credential.credential_subject.as_status_list().unwrap();
        assert_eq!(subject.encoded_list, record.encoded_list);
        assert_eq!(
            subject.id.as_deref(),
            Some("https://badges.example.org/status/7#list")
        );
    }
}
