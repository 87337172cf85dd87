// src/common/mask.rs

// Redação de dados sensíveis para usuários sem a permissão de visualização.
// Todas as funções aceitam Option e devolvem sempre uma String mascarada;
// reaplicar a máscara sobre um valor já mascarado produz o mesmo formato.

const MASK: &str = "****";

// Documentos (CNPJ/CPF): preserva os dois primeiros e os dois últimos
// caracteres quando há material suficiente.
fn mask_document(value: Option<&str>) -> String {
    match value {
        Some(v) if v.chars().count() > 4 => {
            let chars: Vec<char> = v.chars().collect();
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[chars.len() - 2..].iter().collect();
            format!("{head}{MASK}{tail}")
        }
        _ => MASK.to_string(),
    }
}

pub fn mask_cnpj(value: Option<&str>) -> String {
    mask_document(value)
}

pub fn mask_cpf(value: Option<&str>) -> String {
    mask_document(value)
}

// Telefone: só os quatro últimos dígitos ficam visíveis.
pub fn mask_phone(value: Option<&str>) -> String {
    match value {
        Some(v) if v.chars().count() > 4 => {
            let chars: Vec<char> = v.chars().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{MASK}{tail}")
        }
        _ => MASK.to_string(),
    }
}

// E-mail: primeira letra + domínio.
pub fn mask_email(value: Option<&str>) -> String {
    match value {
        Some(v) => match v.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                let first = local.chars().next().unwrap_or('*');
                format!("{first}{MASK}@{domain}")
            }
            _ => MASK.to_string(),
        },
        None => MASK.to_string(),
    }
}

// Endereço: mantém apenas a primeira palavra (tipo do logradouro).
pub fn mask_address(value: Option<&str>) -> String {
    match value {
        Some(v) => match v.split_whitespace().next() {
            Some(first) if v.split_whitespace().count() > 1 => format!("{first} {MASK}"),
            _ => MASK.to_string(),
        },
        None => MASK.to_string(),
    }
}

// Nome do estabelecimento: dois primeiros + até cinco asteriscos + dois
// últimos caracteres, nunca passando de nove no total.
pub fn mask_establishment(value: Option<&str>) -> String {
    match value {
        Some(v) if v.chars().count() > 4 => {
            let chars: Vec<char> = v.chars().collect();
            let stars = (chars.len() - 4).min(5);
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[chars.len() - 2..].iter().collect();
            format!("{head}{}{tail}", "*".repeat(stars))
        }
        _ => MASK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnpj_nulo_vira_mascara_cheia() {
        assert_eq!(mask_cnpj(None), "****");
        assert_eq!(mask_cnpj(Some("")), "****");
        assert_eq!(mask_cnpj(Some("123")), "****");
    }

    #[test]
    fn cnpj_preserva_pontas() {
        assert_eq!(mask_cnpj(Some("12345678000190")), "12****90");
    }

    #[test]
    fn mascarar_duas_vezes_mantem_o_formato() {
        let once = mask_cnpj(Some("12345678000190"));
        let twice = mask_cnpj(Some(&once));
        assert_eq!(once, twice);

        let once = mask_phone(Some("11987654321"));
        assert_eq!(mask_phone(Some(&once)), once);

        let once = mask_email(Some("maria@acme.com.br"));
        assert_eq!(mask_email(Some(&once)), once);

        let once = mask_address(Some("Rua das Flores, 100"));
        assert_eq!(mask_address(Some(&once)), once);
    }

    #[test]
    fn estabelecimento_curto_e_integral() {
        assert_eq!(mask_establishment(Some("AB")), "****");
        assert_eq!(mask_establishment(Some("ABCD")), "****");
    }

    #[test]
    fn estabelecimento_preserva_pontas_com_teto() {
        // 9 caracteres: 2 + 5 asteriscos + 2
        assert_eq!(mask_establishment(Some("ACME CORP")), "AC*****RP");
        assert_eq!(mask_establishment(Some("ACME CORP")).chars().count(), 9);
        // Nomes longos não passam de 9
        assert_eq!(
            mask_establishment(Some("PADARIA DO BAIRRO LTDA")).chars().count(),
            9
        );
    }

    #[test]
    fn telefone_mostra_so_o_final() {
        assert_eq!(mask_phone(Some("11987654321")), "****4321");
        assert_eq!(mask_phone(None), "****");
    }

    #[test]
    fn email_preserva_dominio() {
        assert_eq!(mask_email(Some("maria@acme.com.br")), "m****@acme.com.br");
        assert_eq!(mask_email(Some("sem-arroba")), "****");
    }
}
