//! Credential injection planning.
//!
//! Declarations from the resource become a keyed set of directives. Keys
//! identify the injection target, so a later declaration aimed at the same
//! target replaces an earlier one and the resulting order never depends on
//! declaration order.

use crate::resource::domain::{
    Credentials, ProxyOpts, ScmAuthMethod, SecretNameRef, SshKeySecretRef, TokenSecretRef,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Service-account annotation granting an IRSA role.
pub const IRSA_ANNOTATION: &str = "eks.amazonaws.com/role-arn";
/// Pod annotation granting a KIAM role.
pub const KIAM_ANNOTATION: &str = "iam.amazonaws.com/role";

const DEFAULT_SSH_KEY: &str = "id_rsa";
const DEFAULT_TOKEN_KEY: &str = "token";

/// A secret the executor must resolve at launch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecretLocation {
    /// Secret namespace.
    pub namespace: String,
    /// Secret name.
    pub name: String,
}

impl SecretLocation {
    fn resolve(name: &str, namespace: Option<&str>, default_namespace: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let resolved_namespace = namespace
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(default_namespace);
        Some(Self {
            namespace: resolved_namespace.to_owned(),
            name: trimmed.to_owned(),
        })
    }
}

impl fmt::Display for SecretLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Target of an injection; at most one directive exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InjectionKey {
    /// A single environment variable.
    Env(String),
    /// A whole secret imported as environment variables.
    Secret(SecretLocation),
    /// An annotation on the task service account.
    ServiceAccountAnnotation(String),
    /// An annotation on the task pod.
    PodAnnotation(String),
    /// Git SSH credentials for an SCM host.
    GitSsh(String),
    /// Git HTTPS token for an SCM host.
    GitHttps(String),
    /// The SSH tunnel key.
    SshTunnel,
}

/// How one credential reaches the task pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InjectionDirective {
    /// Set an environment variable from one secret key.
    EnvFromSecretKey {
        /// Variable name.
        env_name: String,
        /// Secret holding the value.
        secret: SecretLocation,
        /// Key within the secret.
        key: String,
    },
    /// Import every key of a secret as environment variables.
    EnvFromSecret {
        /// Secret to import.
        secret: SecretLocation,
    },
    /// Annotate the task service account.
    ServiceAccountAnnotation {
        /// Annotation key.
        key: String,
        /// Annotation value.
        value: String,
    },
    /// Annotate the task pod.
    PodAnnotation {
        /// Annotation key.
        key: String,
        /// Annotation value.
        value: String,
    },
    /// Mount an SSH key for git access to `host`.
    GitSshKey {
        /// SCM host.
        host: String,
        /// Secret holding the key.
        secret: SecretLocation,
        /// Key within the secret.
        key: String,
        /// Route through the SSH tunnel.
        require_proxy: bool,
    },
    /// Mount a token for git HTTPS access to `host`.
    GitToken {
        /// SCM host.
        host: String,
        /// Secret holding the token.
        secret: SecretLocation,
        /// Key within the secret.
        key: String,
        /// Route through the SSH tunnel.
        require_proxy: bool,
    },
    /// Mount the SSH tunnel key.
    TunnelSshKey {
        /// Bastion host.
        host: String,
        /// Bastion user.
        user: String,
        /// Secret holding the key.
        secret: SecretLocation,
        /// Key within the secret.
        key: String,
    },
}

impl InjectionDirective {
    /// Returns the secret this directive reads, if any.
    #[must_use]
    pub const fn secret(&self) -> Option<&SecretLocation> {
        match self {
            Self::EnvFromSecretKey { secret, .. }
            | Self::EnvFromSecret { secret }
            | Self::GitSshKey { secret, .. }
            | Self::GitToken { secret, .. }
            | Self::TunnelSshKey { secret, .. } => Some(secret),
            Self::ServiceAccountAnnotation { .. } | Self::PodAnnotation { .. } => None,
        }
    }
}

/// Deterministic set of credential directives for one task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InjectionSet(BTreeMap<InjectionKey, InjectionDirective>);

impl InjectionSet {
    /// Builds directives for every credential declaration, in order.
    ///
    /// Secret references without a namespace resolve to `namespace`; blank
    /// secret names and blank AWS roles are skipped.
    #[must_use]
    pub fn materialize(credentials: &[Credentials], namespace: &str) -> Self {
        let mut set = Self::default();
        for declaration in credentials {
            if let Some(secret_ref) = declaration.secret_name_ref.as_ref() {
                set.add_secret_ref(secret_ref, namespace);
            }
            if let Some(aws) = declaration.aws_credentials.as_ref() {
                let irsa = aws.irsa.trim();
                if !irsa.is_empty() {
                    set.add_service_account_annotation(IRSA_ANNOTATION, irsa);
                }
                let kiam = aws.kiam.trim();
                if !kiam.is_empty() {
                    set.insert(
                        InjectionKey::PodAnnotation(KIAM_ANNOTATION.to_owned()),
                        InjectionDirective::PodAnnotation {
                            key: KIAM_ANNOTATION.to_owned(),
                            value: kiam.to_owned(),
                        },
                    );
                }
            }
            for (key, value) in &declaration.service_account_annotations {
                set.add_service_account_annotation(key, value);
            }
        }
        set
    }

    /// Adds git credentials for every SCM host.
    #[must_use]
    pub fn with_scm_auth(mut self, methods: &[ScmAuthMethod], namespace: &str) -> Self {
        for method in methods {
            let host = method.host.trim();
            let Some(git) = method.git.as_ref() else {
                continue;
            };
            if let Some(ssh) = git.ssh.as_ref()
                && let Some((secret, key)) = ssh_key_location(&ssh.ssh_key_secret_ref, namespace)
            {
                self.insert(
                    InjectionKey::GitSsh(host.to_owned()),
                    InjectionDirective::GitSshKey {
                        host: host.to_owned(),
                        secret,
                        key,
                        require_proxy: ssh.require_proxy,
                    },
                );
            }
            if let Some(https) = git.https.as_ref()
                && let Some((secret, key)) = token_location(&https.token_secret_ref, namespace)
            {
                self.insert(
                    InjectionKey::GitHttps(host.to_owned()),
                    InjectionDirective::GitToken {
                        host: host.to_owned(),
                        secret,
                        key,
                        require_proxy: https.require_proxy,
                    },
                );
            }
        }
        self
    }

    /// Adds the SSH tunnel key when a tunnel is configured.
    #[must_use]
    pub fn with_ssh_tunnel(mut self, tunnel: Option<&ProxyOpts>, namespace: &str) -> Self {
        if let Some(proxy) = tunnel
            && let Some((secret, key)) = ssh_key_location(&proxy.ssh_key_secret_ref, namespace)
        {
            self.insert(
                InjectionKey::SshTunnel,
                InjectionDirective::TunnelSshKey {
                    host: proxy.host.trim().to_owned(),
                    user: proxy.user.trim().to_owned(),
                    secret,
                    key,
                },
            );
        }
        self
    }

    /// Returns the directive for `key`.
    #[must_use]
    pub fn get(&self, key: &InjectionKey) -> Option<&InjectionDirective> {
        self.0.get(key)
    }

    /// Iterates directives in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&InjectionKey, &InjectionDirective)> {
        self.0.iter()
    }

    /// Returns the number of directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns every secret the executor has to resolve.
    #[must_use]
    pub fn secret_references(&self) -> BTreeSet<SecretLocation> {
        self.0
            .values()
            .filter_map(InjectionDirective::secret)
            .cloned()
            .collect()
    }

    /// Returns the annotations destined for the task service account.
    #[must_use]
    pub fn service_account_annotations(&self) -> BTreeMap<String, String> {
        self.0
            .values()
            .filter_map(|directive| match directive {
                InjectionDirective::ServiceAccountAnnotation { key, value } => {
                    Some((key.clone(), value.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns the annotations destined for the task pod.
    #[must_use]
    pub fn pod_annotations(&self) -> BTreeMap<String, String> {
        self.0
            .values()
            .filter_map(|directive| match directive {
                InjectionDirective::PodAnnotation { key, value } => {
                    Some((key.clone(), value.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn insert(&mut self, key: InjectionKey, directive: InjectionDirective) {
        self.0.insert(key, directive);
    }

    fn add_secret_ref(&mut self, secret_ref: &SecretNameRef, namespace: &str) {
        let Some(secret) =
            SecretLocation::resolve(&secret_ref.name, secret_ref.namespace.as_deref(), namespace)
        else {
            return;
        };
        if let Some(env_key) = secret_ref
            .key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
        {
            self.insert(
                InjectionKey::Env(env_key.to_owned()),
                InjectionDirective::EnvFromSecretKey {
                    env_name: env_key.to_owned(),
                    secret,
                    key: env_key.to_owned(),
                },
            );
            return;
        }
        self.insert(
            InjectionKey::Secret(secret.clone()),
            InjectionDirective::EnvFromSecret { secret },
        );
    }

    fn add_service_account_annotation(&mut self, key: &str, value: &str) {
        self.insert(
            InjectionKey::ServiceAccountAnnotation(key.to_owned()),
            InjectionDirective::ServiceAccountAnnotation {
                key: key.to_owned(),
                value: value.to_owned(),
            },
        );
    }
}

fn ssh_key_location(
    secret_ref: &SshKeySecretRef,
    namespace: &str,
) -> Option<(SecretLocation, String)> {
    let secret =
        SecretLocation::resolve(&secret_ref.name, secret_ref.namespace.as_deref(), namespace)?;
    Some((secret, key_or(secret_ref.key.as_deref(), DEFAULT_SSH_KEY)))
}

fn token_location(
    secret_ref: &TokenSecretRef,
    namespace: &str,
) -> Option<(SecretLocation, String)> {
    let secret =
        SecretLocation::resolve(&secret_ref.name, secret_ref.namespace.as_deref(), namespace)?;
    Some((secret, key_or(secret_ref.key.as_deref(), DEFAULT_TOKEN_KEY)))
}

fn key_or(key: Option<&str>, default: &str) -> String {
    key.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_owned()
}
