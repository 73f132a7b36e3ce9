//! User-facing strings (pt-BR, matching the server-rendered templates).

pub(crate) const REGISTER_OK: &str = "Usuário registrado com sucesso!";
pub(crate) const REGISTER_FAILED: &str = "Erro ao registrar usuário";

pub(crate) const LOGIN_OK: &str = "Login realizado com sucesso!";
pub(crate) const LOGIN_FAILED: &str = "Erro ao fazer login";

pub(crate) const POST_OK: &str = "Post criado com sucesso!";
pub(crate) const POST_FAILED: &str = "Erro ao criar post";
pub(crate) const POST_LOGIN_REQUIRED: &str = "Você precisa estar logado para postar";

pub(crate) const REPO_OK: &str = "Repositório criado com sucesso!";
pub(crate) const REPO_FAILED: &str = "Erro ao criar repositório";
pub(crate) const REPO_LOGIN_REQUIRED: &str = "Você precisa estar logado para criar um repositório";

pub(crate) const FOLLOW_FAILED: &str = "Erro ao seguir/deixar de seguir usuário";
pub(crate) const FOLLOW_LOGIN_REQUIRED: &str = "Você precisa estar logado para seguir usuários";

pub(crate) const LIKE_FAILED: &str = "Erro ao curtir post";
pub(crate) const LIKE_LOGIN_REQUIRED: &str = "Você precisa estar logado para curtir posts";

pub(crate) const COMMENT_FAILED: &str = "Erro ao adicionar comentário";
pub(crate) const COMMENT_LOGIN_REQUIRED: &str = "Você precisa estar logado para comentar";
pub(crate) const COMMENT_EMPTY: &str = "Comentário não pode estar vazio";

pub(crate) const SUGGEST_FAILED: &str = "Erro ao obter sugestão da IA";
pub(crate) const SUGGEST_UNREACHABLE: &str = "Erro ao conectar com o serviço de IA";
pub(crate) const SUGGEST_LOGIN_REQUIRED: &str = "Você precisa estar logado para usar a sugestão IA";
pub(crate) const SUGGEST_EMPTY: &str = "Por favor, insira algum código para obter sugestões";
pub(crate) const SUGGEST_WORKING: &str = "Analisando...";
pub(crate) const SUGGEST_TITLE: &str = "Sugestão da IA";
pub(crate) const SUGGEST_CLOSE: &str = "Fechar";
pub(crate) const SUGGEST_APPLY: &str = "Aplicar Sugestão";

pub(crate) const COPY_OK: &str = "Copiado!";
pub(crate) const COPY_FAILED: &str = "Erro ao copiar código";
pub(crate) const SHARE_OK: &str = "Link copiado para a área de transferência!";
pub(crate) const SHARE_FAILED: &str = "Erro ao copiar link";

pub(crate) const LIKE_LABEL: &str = "Curtir";
