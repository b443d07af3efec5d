use super::*;
use std::sync::Mutex;

// Env vars are process-global; serialize the tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// # Safety
/// Callers must hold `ENV_LOCK`.
unsafe fn clear_llm_env() {
    unsafe {
        std::env::remove_var("LLM_PROVIDER");
        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_API_KEY_ENV");
        std::env::remove_var("LLM_BASE_URL");
        std::env::remove_var("LLM_OPENAI_MODE");
        std::env::remove_var("LLM_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("LLM_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("GOOGLE_API_KEY");
        std::env::remove_var("ANTHROPIC_API_KEY");
        std::env::remove_var("OPENAI_API_KEY");
        std::env::remove_var("TEST_KEY");
    }
}

#[test]
fn from_env_defaults_to_gemini() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_llm_env();
        std::env::set_var("GOOGLE_API_KEY", "secret");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Gemini);
    assert_eq!(cfg.model, "gemini-2.0-flash");
    assert_eq!(cfg.base_url, "https://generativelanguage.googleapis.com/v1beta");
    assert_eq!(cfg.openai_mode, OpenAiApiMode::ChatCompletions);
    assert_eq!(
        cfg.timeouts,
        LlmTimeouts { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.generation, DEFAULT_GENERATION);
    assert_eq!(cfg.api_key, "secret");

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_missing_key_is_config_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_llm_env() };

    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "GOOGLE_API_KEY"));
}

#[test]
fn from_env_blank_key_is_missing() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_llm_env();
        std::env::set_var("GOOGLE_API_KEY", "   ");
    }

    assert!(matches!(LlmConfig::from_env(), Err(LlmError::MissingApiKey { .. })));

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_custom_key_var() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_API_KEY_ENV", "TEST_KEY");
        std::env::set_var("TEST_KEY", "from-custom-var");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.api_key, "from-custom-var");

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_parses_openai_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_PROVIDER", "openai");
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("LLM_OPENAI_MODE", "responses");
        std::env::set_var("LLM_BASE_URL", "https://example.test/v1/");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("LLM_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::OpenAi);
    assert_eq!(cfg.model, "gpt-4o");
    assert_eq!(cfg.openai_mode, OpenAiApiMode::Responses);
    assert_eq!(cfg.base_url, "https://example.test/v1");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_anthropic_model_override() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_PROVIDER", "anthropic");
        std::env::set_var("ANTHROPIC_API_KEY", "ak");
        std::env::set_var("LLM_MODEL", "claude-haiku");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Anthropic);
    assert_eq!(cfg.model, "claude-haiku");
    assert_eq!(cfg.base_url, "https://api.anthropic.com/v1");

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_unknown_provider_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_PROVIDER", "bad");
        std::env::set_var("GOOGLE_API_KEY", "secret");
    }

    let err = LlmConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("unknown LLM_PROVIDER"));

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_unknown_openai_mode_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_llm_env();
        std::env::set_var("GOOGLE_API_KEY", "secret");
        std::env::set_var("LLM_OPENAI_MODE", "bad_mode");
    }

    let err = LlmConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("unsupported openai_api mode"));

    unsafe { clear_llm_env() };
}

#[test]
fn provider_names_round_trip_through_parser() {
    for kind in [LlmProviderKind::Gemini, LlmProviderKind::Anthropic, LlmProviderKind::OpenAi] {
        assert_eq!(parse_provider(Some(kind.as_str())).unwrap(), kind);
    }
}
