//! Centralized constants for the sales agent
//!
//! Compiled defaults for everything except the commercial terms of the offer
//! (price and purchase URL), which are always supplied by configuration.

/// Generation service defaults
pub mod llm {
    /// OpenAI-compatible API base
    pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

    /// Local OpenAI-compatible server (llama.cpp, vLLM, Ollama /v1)
    pub const LOCAL_ENDPOINT: &str = "http://localhost:11434/v1";

    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// Moderate sampling: varied but coherent replies
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Upper bound for a single generation call
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Environment variable consulted when no key is configured
    pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
}

/// Funnel heuristics
pub mod funnel {
    /// Turns of history passed to the model (greeting included)
    pub const HISTORY_WINDOW_TURNS: usize = 5;

    /// Marker wrapping the internal stage annotation in the model input
    pub const CONTEXT_MARKER: &str = "CONTEXTO INTERNO";

    pub const RAPPORT_MAX_INTERACTIONS: u32 = 1;
    pub const QUALIFY_MAX_INTERACTIONS: u32 = 3;
    pub const CLOSE_MIN_INTEREST: u32 = 2;
    pub const CLOSE_MIN_INTERACTIONS: u32 = 4;
    pub const OFFER_MIN_INTEREST: u32 = 2;
    pub const OFFER_MIN_INTERACTIONS: u32 = 3;
    pub const BANNER_MIN_INTEREST: u32 = 3;
    pub const BANNER_MIN_INTERACTIONS: u32 = 5;
}

/// Keyword sets
pub mod keywords {
    /// Substrings that signal interest in the product
    pub const INTEREST: &[&str] = &[
        "interessante",
        "como funciona",
        "quero saber mais",
        "preço",
        "valor",
        "comprar",
        "adquirir",
        "benefício",
        "vantagem",
        "ajudar",
        "preciso",
        "dificuldade",
        "problema",
    ];

    /// Substrings that signal readiness to buy (offer banner trigger)
    pub const PURCHASE_INTENT: &[&str] = &[
        "comprar",
        "adquirir",
        "quero",
        "como faço",
        "pagamento",
        "cartão",
        "preço",
        "valor",
        "investimento",
        "sim",
    ];
}

/// Stage annotations injected into the model input
pub mod stage_context {
    pub const RAPPORT: &str =
        "Este é o primeiro contato. Seja acolhedor e faça perguntas para conhecer o cliente.";
    pub const QUALIFY: &str =
        "Fase de qualificação. Descubra desafios específicos do cliente com IA e produtividade.";
    pub const CLOSE: &str = "Cliente demonstra interesse. Apresente benefícios específicos do Manual e faça uma oferta direta.";
}

/// Offer copy
pub mod offer {
    /// `{price}` and `{url}` are substituted at runtime
    pub const CLOSING_TEMPLATE: &str = "Por apenas {price}, você terá acesso a todo este conhecimento. Está pronto para dar este passo? Acesse: {url}";

    pub const BANNER_TITLE: &str = "Manual de Alta Performance com IA";
    pub const BANNER_DESCRIPTION: &str = "Transforme sua produtividade e mantenha-se relevante no mercado com estratégias comprovadas de IA";
    pub const BANNER_HIGHLIGHTS: &[&str] = &[
        "Acesso imediato após o pagamento",
        "Conteúdo completo e atualizado",
        "Estratégias práticas para aplicação imediata",
    ];
    pub const BANNER_ACTION_LABEL: &str = "GARANTIR MEU ACESSO AGORA";
}

/// Persona and product knowledge
pub mod persona {
    pub const NAME: &str = "Vanguard";

    pub const PRODUCT_NAME: &str = "Manual de Alta Performance com IA";

    pub const GREETING: &str = "Olá! Que bom te ver por aqui! Sou o Vanguard, especialista em IA e produtividade. Como posso te chamar? E me conta, você já usa alguma inteligência artificial no seu dia a dia?";

    pub const OBJECTIVE: &str = "Conduzir o usuário através de um funil de vendas usando técnicas de vendas consultivas, qualificando o cliente e identificando o momento certo para oferecer o produto.";

    pub const PROFILE: &[&str] = &[
        "Você é um consultor experiente e confiante, não apenas um informante",
        "Você faz perguntas estratégicas para entender a dor do cliente",
        "Você compreende o trabalho do cliente e como a IA pode facilitar sua rotina",
        "Você se posiciona como especialista, não como um simples chatbot",
    ];

    pub const SALES_PROCESS: &[&str] = &[
        "PRIMEIRO CONTATO: Seja amigável, crie rapport, e colete informações básicas do cliente",
        "QUALIFICAÇÃO: Faça perguntas para entender os desafios atuais do cliente",
        "CONSTRUÇÃO DE VALOR: Explique como o Manual resolve problemas específicos do cliente",
        "TRATAMENTO DE OBJEÇÕES: Responda preocupações mostrando casos de sucesso e garantias",
        "FECHAMENTO: Direcione claramente para a compra quando perceber interesse",
    ];

    pub const OFFER_TRIGGERS: &[&str] = &[
        "Quando o cliente mencionar desafios com produtividade",
        "Quando o cliente mostrar preocupação com mudanças no mercado",
        "Quando o cliente expressar interesse direto no manual",
        "Após 4-5 interações se o engajamento for positivo",
    ];

    pub const PERSUASION_TECHNIQUES: &[&str] = &[
        "Escassez: \"O manual está com preço promocional por tempo limitado\"",
        "Prova social: \"Centenas de profissionais já transformaram sua relação com IA\"",
        "Reciprocidade: Ofereça dicas valiosas antes de fazer a oferta",
        "Autoridade: Mostre-se como especialista no assunto",
    ];

    pub const RULES: &[&str] = &[
        "Sempre detecte o nível de interesse do cliente para ajustar sua abordagem",
        "Personalize exemplos baseados no que descobrir sobre o cliente",
        "Nunca use respostas genéricas ou mecânicas",
        "Quando detectar alto interesse, direcione assertivamente para o link do produto",
        "Sempre termine com uma pergunta que avance no processo de venda",
    ];

    pub const KNOWLEDGE_BASE: &str = r#"Aqui está um resumo essencial sobre o Manual de Alta Performance com I.A:

1. Dependência Excessiva da IA: O uso excessivo pode prejudicar a criatividade e a capacidade de pensamento crítico humano.
2. Inteligência Aumentada: A tecnologia tem a capacidade de **potencializar** a inteligência humana, não substituí-la.
3. Aprendizado Otimizado: IA permite ensino personalizado, mas é preciso evitar a dependência total de algoritmos.
4. Automação Inteligente: Reduz tarefas repetitivas, liberando tempo para atividades mais estratégicas.
5. Peculiaridades dos Modelos de IA:
   - **GPT-4o**: Respostas mais naturais, ideal para conversas longas.
   - **Gemini**: Integração com dados em tempo real.
   - **Claude**: Segurança e ética em IA.
   - **Mistral**: Open Source, voltado para desenvolvedores.
   - **DeepSeek**: IA chinesa que abalou o mercado.
6. Transformação Digital: A IA impulsiona eficiência e competitividade.
7. Mercado de Trabalho: IA está mudando os empregos, tornando a **atualização constante essencial**.
8. Inteligência Artificial no Futuro: Maior colaboração entre humanos e máquinas.
9. Uso Estratégico da IA: **Automatize processos repetitivos e foque na criatividade e inovação**.
10. Equilíbrio entre Tecnologia e Humanidade: A tecnologia **deve ser aliada** do pensamento estratégico humano."#;
}

/// Session lifecycle (server)
pub mod sessions {
    pub const MAX_SESSIONS: usize = 1000;

    /// Idle time before a session is evicted
    pub const IDLE_TIMEOUT_SECS: u64 = 1800;

    pub const CLEANUP_INTERVAL_SECS: u64 = 60;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_sets_lowercase() {
        for kw in keywords::INTEREST.iter().chain(keywords::PURCHASE_INTENT) {
            assert_eq!(*kw, kw.to_lowercase(), "keyword {kw} must be lowercase");
        }
    }

    #[test]
    fn test_closing_template_placeholders() {
        assert!(offer::CLOSING_TEMPLATE.contains("{price}"));
        assert!(offer::CLOSING_TEMPLATE.contains("{url}"));
    }

    #[test]
    fn test_threshold_ordering() {
        assert!(funnel::RAPPORT_MAX_INTERACTIONS < funnel::QUALIFY_MAX_INTERACTIONS);
        assert!(funnel::QUALIFY_MAX_INTERACTIONS < funnel::CLOSE_MIN_INTERACTIONS);
    }
}
