// src/common/labels.rs

// Vocabulário codificado do processador -> rótulos em português para a UI.
// O match é sempre exato e exaustivo: "PRE_AUTHORIZED" nunca pode cair no
// rótulo de "AUTHORIZED". Códigos fora do vocabulário caem em Unknown/Outros
// preservando a string original na linha da transação.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Authorized,
    PreAuthorized,
    Captured,
    Cancelled,
    Denied,
    Pending,
    Refunded,
    Unknown,
}

impl TransactionStatus {
    pub fn parse(code: &str) -> Self {
        match code {
            "AUTHORIZED" => TransactionStatus::Authorized,
            "PRE_AUTHORIZED" => TransactionStatus::PreAuthorized,
            "CAPTURED" => TransactionStatus::Captured,
            "CANCELLED" => TransactionStatus::Cancelled,
            "DENIED" => TransactionStatus::Denied,
            "PENDING" => TransactionStatus::Pending,
            "REFUNDED" => TransactionStatus::Refunded,
            _ => TransactionStatus::Unknown,
        }
    }

    pub fn label_pt(self) -> &'static str {
        match self {
            TransactionStatus::Authorized => "Autorizada",
            TransactionStatus::PreAuthorized => "Pré-autorizada",
            TransactionStatus::Captured => "Capturada",
            TransactionStatus::Cancelled => "Cancelada",
            TransactionStatus::Denied => "Negada",
            TransactionStatus::Pending => "Pendente",
            TransactionStatus::Refunded => "Estornada",
            TransactionStatus::Unknown => "Desconhecido",
        }
    }

    // Status que contam dinheiro em relatórios e consolidação de repasse.
    pub fn is_settled(self) -> bool {
        matches!(self, TransactionStatus::Authorized | TransactionStatus::Captured)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    CreditoAVista,
    CreditoParcelado,
    Debito,
    Pix,
    Voucher,
    Outros,
}

impl ProductType {
    pub fn parse(code: &str) -> Self {
        match code {
            "CREDIT" => ProductType::CreditoAVista,
            "CREDIT_INSTALLMENTS" => ProductType::CreditoParcelado,
            "DEBIT" => ProductType::Debito,
            "PIX" => ProductType::Pix,
            "VOUCHER" => ProductType::Voucher,
            _ => ProductType::Outros,
        }
    }

    pub fn label_pt(self) -> &'static str {
        match self {
            ProductType::CreditoAVista => "Crédito à vista",
            ProductType::CreditoParcelado => "Crédito parcelado",
            ProductType::Debito => "Débito",
            ProductType::Pix => "Pix",
            ProductType::Voucher => "Voucher",
            ProductType::Outros => "Outros",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Elo,
    Amex,
    Hipercard,
    Cabal,
    Banescard,
    Outros,
}

impl CardBrand {
    pub fn parse(code: &str) -> Self {
        match code {
            "VISA" => CardBrand::Visa,
            "MASTERCARD" => CardBrand::Mastercard,
            "ELO" => CardBrand::Elo,
            "AMEX" => CardBrand::Amex,
            "HIPERCARD" => CardBrand::Hipercard,
            "CABAL" => CardBrand::Cabal,
            "BANESCARD" => CardBrand::Banescard,
            _ => CardBrand::Outros,
        }
    }

    pub fn label_pt(self) -> &'static str {
        match self {
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::Elo => "Elo",
            CardBrand::Amex => "American Express",
            CardBrand::Hipercard => "Hipercard",
            CardBrand::Cabal => "Cabal",
            CardBrand::Banescard => "Banescard",
            CardBrand::Outros => "Outras bandeiras",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureChannel {
    Pos,
    ECommerce,
    App,
    Link,
    Outros,
}

impl CaptureChannel {
    pub fn parse(code: &str) -> Self {
        match code {
            "POS" => CaptureChannel::Pos,
            "ECOMMERCE" => CaptureChannel::ECommerce,
            "APP" => CaptureChannel::App,
            "PAYMENT_LINK" => CaptureChannel::Link,
            _ => CaptureChannel::Outros,
        }
    }

    pub fn label_pt(self) -> &'static str {
        match self {
            CaptureChannel::Pos => "Maquininha (POS)",
            CaptureChannel::ECommerce => "E-commerce",
            CaptureChannel::App => "Aplicativo",
            CaptureChannel::Link => "Link de pagamento",
            CaptureChannel::Outros => "Outros canais",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_autorizada_nao_cai_em_autorizada() {
        assert_eq!(TransactionStatus::parse("PRE_AUTHORIZED"), TransactionStatus::PreAuthorized);
        assert_eq!(TransactionStatus::parse("AUTHORIZED"), TransactionStatus::Authorized);
        assert_ne!(
            TransactionStatus::parse("PRE_AUTHORIZED").label_pt(),
            TransactionStatus::parse("AUTHORIZED").label_pt()
        );
    }

    #[test]
    fn codigo_desconhecido_nao_explode() {
        assert_eq!(TransactionStatus::parse("ALGO_NOVO"), TransactionStatus::Unknown);
        assert_eq!(CardBrand::parse("???").label_pt(), "Outras bandeiras");
        assert_eq!(ProductType::parse("").label_pt(), "Outros");
    }

    #[test]
    fn somente_autorizada_e_capturada_liquidam() {
        assert!(TransactionStatus::Authorized.is_settled());
        assert!(TransactionStatus::Captured.is_settled());
        assert!(!TransactionStatus::PreAuthorized.is_settled());
        assert!(!TransactionStatus::Refunded.is_settled());
    }
}
