use paytrail::domain::audit::{ActionType, AuditEntry, EntityType};
use paytrail::domain::payment::{Amount, Payment};
use paytrail::domain::ports::{AuditStoreBox, PaymentStoreBox};
use paytrail::infrastructure::in_memory::{InMemoryAuditStore, InMemoryPaymentStore};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let payment_store: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());
    let audit_store: AuditStoreBox = Box::new(InMemoryAuditStore::new());

    let payment = Payment::new(Amount::new(dec!(100.0), "USD").unwrap(), "boxed");
    let id = payment.id().clone();
    let entry = AuditEntry::new(EntityType::Payment, id.as_str(), ActionType::Created, "user-1");
    let audit_id = entry.id().clone();

    // Verify Send + Sync by spawning tasks
    let ps_handle = tokio::spawn(async move {
        payment_store.save(payment).await.unwrap();
        payment_store.find_by_id(&id).await.unwrap()
    });

    let as_handle = tokio::spawn(async move {
        audit_store.save(entry).await.unwrap();
        audit_store.find_by_id(&audit_id).await.unwrap()
    });

    let retrieved_payment = ps_handle.await.unwrap();
    assert_eq!(retrieved_payment.description(), "boxed");

    let retrieved_entry = as_handle.await.unwrap();
    assert_eq!(retrieved_entry.entity_id(), retrieved_payment.id().as_str());
}
