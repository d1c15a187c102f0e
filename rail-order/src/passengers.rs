use rail_core::validation::{
    format_phone, is_valid_birthday, is_valid_document, is_valid_email, is_valid_phone, sanitize_birthday,
    sanitize_certificate_number, sanitize_email, sanitize_name, sanitize_passport_number, sanitize_passport_series,
    ValidationResult,
};
use rail_core::{CoreError, CoreResult, Field};
use rail_shared::{DocumentType, Masked};
use uuid::Uuid;

use crate::models::{Passenger, PassengerField, Payer, PayerField};

fn parse_flag(value: &str) -> CoreResult<bool> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(CoreError::ValidationError(Field::Passengers)),
    }
}

fn parse_doc_type(value: &str) -> CoreResult<DocumentType> {
    match value.trim() {
        "passport" => Ok(DocumentType::Passport),
        "birth_certificate" => Ok(DocumentType::BirthCertificate),
        _ => Err(CoreError::ValidationError(Field::DocumentNumber)),
    }
}

impl Passenger {
    pub fn blank(is_adult: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            is_adult,
            surname: String::new(),
            name: String::new(),
            patron: String::new(),
            gender: true,
            birthday: String::new(),
            doc_type: DocumentType::Passport,
            doc_series: Masked::default(),
            doc_number: Masked::default(),
            is_limited_mobility: false,
        }
    }

    fn sanitize_document(&self, value: &str, series: bool) -> String {
        match (self.doc_type, series) {
            (DocumentType::Passport, true) => sanitize_passport_series(value),
            (DocumentType::Passport, false) => sanitize_passport_number(value),
            (DocumentType::BirthCertificate, _) => sanitize_certificate_number(value),
        }
    }

    /// Switching document type clears the number, and the series unless the
    /// new type is a passport.
    pub fn set_doc_type(&mut self, doc_type: DocumentType) {
        if doc_type != DocumentType::Passport {
            self.doc_series = Masked::default();
        }
        self.doc_number = Masked::default();
        self.doc_type = doc_type;
    }

    /// Applies one keystroke-level edit with the field's input mask.
    pub fn set_field(&mut self, field: PassengerField, value: &str) -> CoreResult<()> {
        match field {
            PassengerField::Surname => self.surname = sanitize_name(value),
            PassengerField::Name => self.name = sanitize_name(value),
            PassengerField::Patron => self.patron = sanitize_name(value),
            PassengerField::Birthday => self.birthday = sanitize_birthday(value),
            PassengerField::DocSeries => self.doc_series = Masked(self.sanitize_document(value, true)),
            PassengerField::DocNumber => self.doc_number = Masked(self.sanitize_document(value, false)),
            PassengerField::DocType => self.set_doc_type(parse_doc_type(value)?),
            PassengerField::Gender => self.gender = parse_flag(value)?,
            PassengerField::IsLimitedMobility => self.is_limited_mobility = parse_flag(value)?,
            PassengerField::IsAdult => self.is_adult = parse_flag(value)?,
        }
        Ok(())
    }

    /// Runs every input mask over a record submitted as a whole.
    pub fn sanitized(mut self) -> Self {
        self.surname = sanitize_name(&self.surname);
        self.name = sanitize_name(&self.name);
        self.patron = sanitize_name(&self.patron);
        self.birthday = sanitize_birthday(&self.birthday);
        self.doc_series = Masked(self.sanitize_document(&self.doc_series, true));
        self.doc_number = Masked(self.sanitize_document(&self.doc_number, false));
        if self.doc_type == DocumentType::BirthCertificate {
            self.doc_series = Masked::default();
        }
        self
    }
}

pub fn validate_passenger(passenger: &Passenger) -> ValidationResult {
    let mut result = ValidationResult::default();
    result.check(!passenger.surname.trim().is_empty(), Field::Surname);
    result.check(!passenger.name.trim().is_empty(), Field::Name);
    result.check(!passenger.patron.trim().is_empty(), Field::Patronymic);
    result.check(is_valid_birthday(&passenger.birthday), Field::Birthday);

    if !is_valid_document(passenger.doc_type, &passenger.doc_series, &passenger.doc_number) {
        let field = match passenger.doc_type {
            DocumentType::Passport if passenger.doc_series.len() != 4 => Field::DocumentSeries,
            _ => Field::DocumentNumber,
        };
        result.errors.push(field);
    }
    result
}

impl Payer {
    pub fn set_field(&mut self, field: PayerField, value: &str) {
        match field {
            PayerField::Surname => self.surname = sanitize_name(value),
            PayerField::Name => self.name = sanitize_name(value),
            PayerField::Patron => self.patron = sanitize_name(value),
            PayerField::Phone => self.phone = Masked(format_phone(value)),
            PayerField::Email => self.email = Masked(sanitize_email(value)),
        }
    }
}

pub fn validate_payer(payer: &Payer) -> ValidationResult {
    let mut result = ValidationResult::default();
    result.check(!payer.surname.trim().is_empty(), Field::Surname);
    result.check(!payer.name.trim().is_empty(), Field::Name);
    result.check(!payer.patron.trim().is_empty(), Field::Patronymic);
    result.check(is_valid_phone(&payer.phone), Field::Phone);
    result.check(is_valid_email(&payer.email), Field::Email);
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_adult() -> Passenger {
        let mut p = Passenger::blank(true);
        p.set_field(PassengerField::Surname, "петров").unwrap();
        p.set_field(PassengerField::Name, "пётр").unwrap();
        p.set_field(PassengerField::Patron, "петрович").unwrap();
        p.set_field(PassengerField::Birthday, "01021990").unwrap();
        p.set_field(PassengerField::DocSeries, "4512").unwrap();
        p.set_field(PassengerField::DocNumber, "123456").unwrap();
        p
    }

    pub(crate) fn valid_payer() -> Payer {
        let mut payer = Payer::default();
        payer.set_field(PayerField::Surname, "петров");
        payer.set_field(PayerField::Name, "пётр");
        payer.set_field(PayerField::Patron, "петрович");
        payer.set_field(PayerField::Phone, "89991234567");
        payer.set_field(PayerField::Email, "petrov@mail.ru");
        payer
    }

    #[test]
    fn test_field_masks() {
        let p = valid_adult();
        assert_eq!(p.surname, "Петров");
        assert_eq!(p.birthday, "01.02.1990");
        assert!(validate_passenger(&p).is_valid());
    }

    #[test]
    fn test_doc_type_change_clears_fields() {
        let mut p = valid_adult();
        p.set_field(PassengerField::DocType, "birth_certificate").unwrap();
        assert!(p.doc_series.is_empty());
        assert!(p.doc_number.is_empty());

        p.set_field(PassengerField::DocNumber, "viii-ып-123456").unwrap();
        assert_eq!(p.doc_number.0, "VIII-ЫП-123456");
        assert!(validate_passenger(&p).is_valid());

        p.doc_series = Masked("12".into());
        p.set_field(PassengerField::DocType, "passport").unwrap();
        assert_eq!(p.doc_series.0, "12");
        assert!(p.doc_number.is_empty());
    }

    #[test]
    fn test_passport_inputs_are_digit_only() {
        let mut p = Passenger::blank(true);
        p.set_field(PassengerField::DocSeries, "45a12345").unwrap();
        assert_eq!(p.doc_series.0, "4512");
        p.set_field(PassengerField::DocNumber, "12-34-56-78").unwrap();
        assert_eq!(p.doc_number.0, "123456");
    }

    #[test]
    fn test_invalid_passenger_reports_fields() {
        let mut p = valid_adult();
        p.patron = "  ".into();
        p.birthday = "31.04.1990".into();
        p.doc_series = Masked("45".into());
        let result = validate_passenger(&p);
        assert_eq!(result.errors, vec![Field::Patronymic, Field::Birthday, Field::DocumentSeries]);
    }

    #[test]
    fn test_bad_flag_is_rejected() {
        let mut p = Passenger::blank(true);
        assert!(p.set_field(PassengerField::Gender, "maybe").is_err());
        p.set_field(PassengerField::Gender, "false").unwrap();
        assert!(!p.gender);
    }

    #[test]
    fn test_payer_validation() {
        let payer = valid_payer();
        assert_eq!(payer.phone.0, "8 999 123 45 67");
        assert!(validate_payer(&payer).is_valid());

        let mut broken = payer.clone();
        broken.set_field(PayerField::Email, "почта@");
        broken.set_field(PayerField::Phone, "123");
        assert_eq!(validate_payer(&broken).errors, vec![Field::Phone, Field::Email]);
    }

    #[test]
    fn test_sanitized_record() {
        let mut raw = valid_adult();
        raw.surname = "сидоров1".into();
        raw.doc_number = Masked("12 34 56".into());
        let clean = raw.sanitized();
        assert_eq!(clean.surname, "Сидоров");
        assert_eq!(clean.doc_number.0, "123456");
    }
}
