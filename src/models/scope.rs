// src/models/scope.rs

// Escopo de acesso resolvido uma vez por requisição e passado explicitamente
// a cada consulta. Nenhuma query de listagem roda sem conjugar este filtro.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    // SUPER_ADMIN: sem restrição de cliente
    Unrestricted,
    // Demais papéis: conjunto fixo de clientes permitidos (pode ser vazio,
    // e vazio significa página vazia, nunca erro)
    Customers(Vec<i64>),
}

impl AccessScope {
    // Interseção do escopo com um filtro de cliente pedido pela UI.
    // Um pedido fora do escopo resulta no filtro vazio.
    pub fn narrow(&self, requested: Option<i64>) -> AccessScope {
        match (self, requested) {
            (AccessScope::Unrestricted, None) => AccessScope::Unrestricted,
            (AccessScope::Unrestricted, Some(id)) => AccessScope::Customers(vec![id]),
            (AccessScope::Customers(allowed), None) => AccessScope::Customers(allowed.clone()),
            (AccessScope::Customers(allowed), Some(id)) => {
                if allowed.contains(&id) {
                    AccessScope::Customers(vec![id])
                } else {
                    AccessScope::Customers(Vec::new())
                }
            }
        }
    }

    // Forma que as queries entendem: None = sem filtro; Some(ids) = ANY(ids).
    // Bind como `$n::bigint[]` com a cláusula `($n IS NULL OR customer_id = ANY($n))`.
    pub fn as_filter(&self) -> Option<Vec<i64>> {
        match self {
            AccessScope::Unrestricted => None,
            AccessScope::Customers(ids) => Some(ids.clone()),
        }
    }

    // Um único cliente obrigatório (repasse): Some quando o escopo determina
    // exatamente um cliente.
    pub fn single_customer(&self) -> Option<i64> {
        match self {
            AccessScope::Customers(ids) if ids.len() == 1 => Some(ids[0]),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AccessScope::Customers(ids) if ids.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtro_pedido_fora_do_escopo_vira_vazio() {
        let scope = AccessScope::Customers(vec![7]);
        // Pedir um cliente mais amplo não fura o escopo
        assert_eq!(scope.narrow(Some(9)), AccessScope::Customers(vec![]));
        assert!(scope.narrow(Some(9)).is_empty());
    }

    #[test]
    fn filtro_dentro_do_escopo_estreita() {
        let scope = AccessScope::Customers(vec![7, 8]);
        assert_eq!(scope.narrow(Some(7)), AccessScope::Customers(vec![7]));
        assert_eq!(scope.narrow(None), AccessScope::Customers(vec![7, 8]));
    }

    #[test]
    fn super_admin_estreita_sem_restricao() {
        assert_eq!(AccessScope::Unrestricted.narrow(None), AccessScope::Unrestricted);
        assert_eq!(
            AccessScope::Unrestricted.narrow(Some(3)),
            AccessScope::Customers(vec![3])
        );
    }

    #[test]
    fn conjunto_vazio_gera_filtro_que_nao_casa_nada() {
        let scope = AccessScope::Customers(vec![]);
        assert_eq!(scope.as_filter(), Some(vec![]));
        assert!(scope.is_empty());
    }
}
