// src/common/i18n.rs

use std::collections::HashMap;

// Catálogo de mensagens por código de erro. O idioma vem do cabeçalho
// Accept-Language (extrator Locale); "pt" é o padrão do portal.
#[derive(Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, [&'static str; 2]>,
}

const PT: usize = 0;
const EN: usize = 1;

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, [&'static str; 2]> = HashMap::new();

        messages.insert("validation", [
            "Um ou mais campos são inválidos.",
            "One or more fields are invalid.",
        ]);
        messages.insert("email_already_exists", [
            "Este e-mail já está em uso.",
            "This e-mail is already in use.",
        ]);
        messages.insert("invalid_credentials", [
            "E-mail ou senha inválidos.",
            "Invalid e-mail or password.",
        ]);
        messages.insert("invalid_token", [
            "Token de autenticação inválido ou ausente.",
            "Invalid or missing authentication token.",
        ]);
        messages.insert("user_not_found", [
            "Usuário não encontrado.",
            "User not found.",
        ]);
        messages.insert("access_denied", [
            "Você não tem permissão para esta operação.",
            "You do not have permission for this operation.",
        ]);
        messages.insert("merchant_not_found", [
            "Estabelecimento não encontrado.",
            "Merchant not found.",
        ]);
        messages.insert("category_not_found", [
            "Categoria não encontrada.",
            "Category not found.",
        ]);
        messages.insert("solicitation_not_found", [
            "Solicitação não encontrada.",
            "Solicitation not found.",
        ]);
        messages.insert("settlement_not_found", [
            "Fechamento não encontrado.",
            "Settlement not found.",
        ]);
        messages.insert("invoice_not_found", [
            "Nota fiscal não encontrada.",
            "Invoice not found.",
        ]);
        messages.insert("file_not_found", [
            "Arquivo não encontrado.",
            "File not found.",
        ]);
        messages.insert("customer_not_found", [
            "Cliente (ISO) não encontrado.",
            "Customer (ISO) not found.",
        ]);
        messages.insert("customer_required", [
            "Informe o cliente (ISO) desejado.",
            "A customer (ISO) must be informed.",
        ]);
        messages.insert("unsupported_file_type", [
            "Tipo de arquivo não suportado. Envie PDF ou XML.",
            "Unsupported file type. Send a PDF or XML.",
        ]);
        messages.insert("file_too_large", [
            "Arquivo excede o tamanho máximo de 5MB.",
            "File exceeds the 5MB size limit.",
        ]);
        messages.insert("commission_below_minimum", [
            "Comissão abaixo do mínimo de R$ 100,00; o valor será acumulado.",
            "Commission below the BRL 100.00 minimum; the amount will be accumulated.",
        ]);
        messages.insert("invalid_status_transition", [
            "Transição de status não permitida.",
            "Status transition not allowed.",
        ]);
        messages.insert("missing_documents", [
            "Anexe ao menos um documento antes de enviar.",
            "Attach at least one document before submitting.",
        ]);
        messages.insert("dock_sync_disabled", [
            "Sincronização com a Dock desabilitada neste ambiente.",
            "Dock synchronization is disabled in this environment.",
        ]);
        messages.insert("dock_api_error", [
            "Falha ao consultar a API da Dock.",
            "Dock API request failed.",
        ]);
        messages.insert("storage_write_failed", [
            "Falha ao gravar o arquivo no storage.",
            "Failed to write the file to storage.",
        ]);
        messages.insert("internal", [
            "Ocorreu um erro inesperado.",
            "An unexpected error occurred.",
        ]);

        Self { messages }
    }

    pub fn translate(&self, code: &str, lang: &str) -> String {
        let idx = if lang == "en" { EN } else { PT };
        self.messages
            .get(code)
            .map(|m| m[idx].to_string())
            .unwrap_or_else(|| self.messages["internal"][idx].to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padrao_em_portugues() {
        let store = I18nStore::new();
        assert_eq!(store.translate("user_not_found", "pt"), "Usuário não encontrado.");
        // Idioma desconhecido cai no português
        assert_eq!(store.translate("user_not_found", "fr"), "Usuário não encontrado.");
    }

    #[test]
    fn codigo_desconhecido_vira_erro_generico() {
        let store = I18nStore::new();
        assert_eq!(store.translate("nao_existe", "en"), "An unexpected error occurred.");
    }
}
