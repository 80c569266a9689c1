use crate::domain::{BookingValidationError, Notes, commands::CreateBooking};

/// 予約作成コマンドを検証する
///
/// 協調先を呼び出す前に実行され、最初に見つかった違反を返す。
/// 成功時は検証済みのメモを返す。
pub fn validate_create_booking(cmd: &CreateBooking) -> Result<Notes, BookingValidationError> {
    if cmd.business_id.is_nil() {
        return Err(BookingValidationError::BusinessIdRequired);
    }
    if cmd.customer_id.is_nil() {
        return Err(BookingValidationError::CustomerIdRequired);
    }
    if cmd.staff_id.is_nil() {
        return Err(BookingValidationError::StaffIdRequired);
    }
    if cmd.service_id.is_nil() {
        return Err(BookingValidationError::ServiceIdRequired);
    }
    if cmd.slot_id.is_nil() {
        return Err(BookingValidationError::SlotIdRequired);
    }

    Notes::new(cmd.notes.as_str())
}

/// 更新時のメモを検証する（未指定なら変更なし）
pub fn validate_notes(notes: Option<String>) -> Result<Option<Notes>, BookingValidationError> {
    notes.map(Notes::new).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn valid_command() -> CreateBooking {
        CreateBooking {
            business_id: BusinessId::new(),
            customer_id: CustomerId::new(),
            staff_id: StaffId::new(),
            service_id: ServiceId::new(),
            slot_id: SlotId::new(),
            notes: "first visit".to_string(),
            requested_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_command_passes() {
        let notes = validate_create_booking(&valid_command()).unwrap();
        assert_eq!(notes.as_str(), "first visit");
    }

    #[test]
    fn test_each_nil_identifier_is_reported() {
        let nil = Uuid::nil();

        let mut cmd = valid_command();
        cmd.business_id = BusinessId::from_uuid(nil);
        assert_eq!(
            validate_create_booking(&cmd),
            Err(BookingValidationError::BusinessIdRequired)
        );

        let mut cmd = valid_command();
        cmd.customer_id = CustomerId::from_uuid(nil);
        assert_eq!(
            validate_create_booking(&cmd),
            Err(BookingValidationError::CustomerIdRequired)
        );

        let mut cmd = valid_command();
        cmd.staff_id = StaffId::from_uuid(nil);
        assert_eq!(
            validate_create_booking(&cmd),
            Err(BookingValidationError::StaffIdRequired)
        );

        let mut cmd = valid_command();
        cmd.service_id = ServiceId::from_uuid(nil);
        assert_eq!(
            validate_create_booking(&cmd),
            Err(BookingValidationError::ServiceIdRequired)
        );

        let mut cmd = valid_command();
        cmd.slot_id = SlotId::from_uuid(nil);
        assert_eq!(
            validate_create_booking(&cmd),
            Err(BookingValidationError::SlotIdRequired)
        );
    }

    #[test]
    fn test_long_notes_rejected() {
        let mut cmd = valid_command();
        cmd.notes = "n".repeat(501);
        assert!(matches!(
            validate_create_booking(&cmd),
            Err(BookingValidationError::NotesTooLong { actual: 501, .. })
        ));
    }

    #[test]
    fn test_validate_notes_optional() {
        assert_eq!(validate_notes(None), Ok(None));
        assert_eq!(
            validate_notes(Some("ok".to_string())).unwrap().unwrap().as_str(),
            "ok"
        );
        assert!(validate_notes(Some("n".repeat(501))).is_err());
    }
}
